// src/lib.rs
//
// Frame-level vehicle detection and traffic telemetry. One frame goes
// in, one immutable CameraData record comes out:
//
//   inference -> parse -> suppress -> classify -> estimate -> record
//
// Video capture, rendering, and the inference model itself are
// external collaborators behind the FrameSource, TelemetrySink, and
// InferenceBackend traits.

pub mod classifier;
pub mod config;
pub mod density;
pub mod error;
pub mod inference;
pub mod nms;
pub mod parser;
pub mod pipeline;
pub mod preprocessing;
pub mod sink;
pub mod source;
pub mod telemetry;
pub mod types;

pub use config::Config;
pub use error::{PipelineError, Stage};
pub use inference::InferenceBackend;
pub use pipeline::{PipelineMetrics, PipelineOrchestrator};
pub use sink::{JsonLinesSink, TelemetrySink};
pub use source::FrameSource;
pub use telemetry::TelemetryAggregator;
pub use types::{BBox, CameraData, Detection, Frame};
