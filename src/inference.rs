// src/inference.rs
//
// Inference boundary. The pipeline treats the model as opaque: it hands
// over a frame and gets back score tensors whose rows encode
// [cx, cy, w, h, class scores...]. An ONNX Runtime backend is available
// behind the `onnx` feature; tests and the demo binary use stub
// backends instead.

use crate::types::Frame;
use anyhow::Result;
use ndarray::Array2;

/// External inference engine.
///
/// `infer` is synchronous and boundedly long; the orchestrator measures
/// it against the configured budget. Implementations that are not
/// reentrant must be instantiated once per camera pipeline.
pub trait InferenceBackend {
    fn infer(&mut self, frame: &Frame) -> Result<Vec<Array2<f32>>>;
}

#[cfg(feature = "onnx")]
pub use onnx::OnnxBackend;

#[cfg(feature = "onnx")]
mod onnx {
    use super::InferenceBackend;
    use crate::config::ModelConfig;
    use crate::preprocessing;
    use crate::types::Frame;
    use anyhow::{Context, Result};
    use ndarray::Array2;
    use ort::session::{builder::GraphOptimizationLevel, Session};
    use tracing::{debug, info};

    /// ONNX Runtime session wrapper producing score tensors in the
    /// row-major [cx, cy, w, h, scores...] layout the parser expects.
    pub struct OnnxBackend {
        session: Session,
        config: ModelConfig,
    }

    impl OnnxBackend {
        pub fn new(config: ModelConfig) -> Result<Self> {
            info!("Initializing inference engine");
            info!("Model path: {}", config.path);

            let session = Session::builder()?
                .with_optimization_level(GraphOptimizationLevel::Level3)?
                .with_intra_threads(config.num_threads)?
                .commit_from_file(&config.path)
                .context("Failed to load model")?;

            info!("✓ Inference engine initialized successfully");
            Ok(Self { session, config })
        }
    }

    impl InferenceBackend for OnnxBackend {
        fn infer(&mut self, frame: &Frame) -> Result<Vec<Array2<f32>>> {
            let blob = preprocessing::to_blob(
                &frame.data,
                frame.width as usize,
                frame.height as usize,
                self.config.input_width,
                self.config.input_height,
            )?;

            let shape = [
                1usize,
                3,
                self.config.input_height,
                self.config.input_width,
            ];
            let input_value =
                ort::value::Value::from_array((shape.as_slice(), blob.into_boxed_slice()))?;

            let outputs = self.session.run(ort::inputs!["images" => input_value])?;

            let mut tensors = Vec::with_capacity(outputs.len());
            for (_, output) in outputs.iter() {
                let (output_shape, data) = output.try_extract_tensor::<f32>()?;
                debug!("Model output shape: {:?}", output_shape);

                let dims: Vec<usize> = output_shape.iter().map(|&d| d as usize).collect();
                let cols = *dims
                    .last()
                    .context("model output has no dimensions")?;
                let rows = data.len() / cols.max(1);

                tensors.push(Array2::from_shape_vec((rows, cols), data.to_vec())?);
            }

            Ok(tensors)
        }
    }
}
