// src/pipeline/orchestrator.rs
//
// Sequences the per-frame stages for one camera:
// inference -> parse -> suppress -> classify -> estimate -> record.
// Strictly sequential: frame N's telemetry is committed before frame
// N+1 starts, so the history stays in frame order. One instance per
// camera; instances share nothing mutable.

use crate::classifier;
use crate::config::Config;
use crate::density;
use crate::error::{PipelineError, Stage};
use crate::inference::InferenceBackend;
use crate::nms;
use crate::parser;
use crate::pipeline::metrics::PipelineMetrics;
use crate::telemetry::TelemetryAggregator;
use crate::types::{CameraData, Frame};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, warn};

pub struct PipelineOrchestrator<B: InferenceBackend> {
    camera_id: u32,
    backend: B,
    config: Config,
    taxonomy: HashSet<String>,
    aggregator: TelemetryAggregator,
    metrics: PipelineMetrics,
}

impl<B: InferenceBackend> PipelineOrchestrator<B> {
    pub fn new(camera_id: u32, backend: B, config: Config) -> Self {
        let taxonomy: HashSet<String> =
            config.detection.vehicle_classes.iter().cloned().collect();
        let aggregator = TelemetryAggregator::new(config.telemetry.history_capacity);
        Self {
            camera_id,
            backend,
            config,
            taxonomy,
            aggregator,
            metrics: PipelineMetrics::new(),
        }
    }

    /// Process one frame into a committed telemetry record.
    ///
    /// `None` means the source produced no frame (end of stream or a
    /// dropped read); that returns `Ok(None)` without touching history.
    /// A stage failure returns a tagged error for this frame only, with
    /// no partial commit; the caller is expected to continue with the
    /// next frame.
    pub fn process(&mut self, frame: Option<Frame>) -> Result<Option<CameraData>, PipelineError> {
        let Some(frame) = frame else {
            self.metrics.inc(&self.metrics.frames_skipped);
            debug!(camera_id = self.camera_id, "No frame available, skipping");
            return Ok(None);
        };

        match self.run_frame(frame) {
            Ok(data) => {
                self.metrics.inc(&self.metrics.frames_processed);
                self.metrics
                    .add(&self.metrics.vehicles_counted, data.vehicle_count as u64);
                Ok(Some(data))
            }
            Err(err) => {
                self.metrics.inc(&self.metrics.frames_failed);
                warn!(camera_id = self.camera_id, "Frame failed: {err}");
                Err(err)
            }
        }
    }

    fn run_frame(&mut self, frame: Frame) -> Result<CameraData, PipelineError> {
        let inference_start = Instant::now();
        let tensors = self
            .backend
            .infer(&frame)
            .map_err(|e| PipelineError::stage(Stage::Inference, e))?;
        let inference_elapsed = inference_start.elapsed();

        if let Some(budget_ms) = self.config.inference.timeout_ms {
            let elapsed_ms = inference_elapsed.as_millis() as u64;
            if elapsed_ms > budget_ms {
                return Err(PipelineError::InferenceTimeout {
                    elapsed_ms,
                    budget_ms,
                });
            }
        }
        self.metrics.set_timing(
            &self.metrics.inference_time_us,
            inference_elapsed.as_micros() as u64,
        );

        let post_start = Instant::now();
        let candidates = parser::parse(
            &tensors,
            frame.width,
            frame.height,
            self.config.detection.confidence_threshold,
            &self.config.model.class_names,
        )
        .map_err(|e| PipelineError::stage(Stage::Parse, e))?;

        let deduplicated = nms::suppress(candidates, self.config.detection.iou_threshold);
        let vehicles = classifier::filter(deduplicated, &self.taxonomy);

        let (traffic_density, type_counts) = density::estimate(&vehicles, frame.width, frame.height)
            .map_err(|e| PipelineError::stage(Stage::Density, e))?;
        self.metrics.set_timing(
            &self.metrics.postprocess_time_us,
            post_start.elapsed().as_micros() as u64,
        );

        let data =
            self.aggregator
                .record(self.camera_id, frame.timestamp_ms, type_counts, traffic_density);

        debug!(
            camera_id = self.camera_id,
            vehicle_count = data.vehicle_count,
            traffic_density = data.traffic_density,
            "Frame processed"
        );
        Ok(data)
    }

    /// Snapshot of this camera's telemetry history, oldest first.
    pub fn history(&self) -> Vec<CameraData> {
        self.aggregator.history(self.camera_id)
    }

    /// End the camera session: drop all retained history.
    pub fn release(&mut self) {
        self.aggregator.release(self.camera_id);
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }
}
