// src/error.rs
//
// Per-frame failure taxonomy. A failed frame never terminates the
// camera loop and never commits partial telemetry; the caller logs it
// and moves on to the next frame. End-of-stream is not an error — the
// frame source signals it with `None`.

use std::fmt;
use thiserror::Error;

/// Which pipeline stage raised a per-frame failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Inference,
    Parse,
    Suppress,
    Classify,
    Density,
    Record,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inference => "inference",
            Self::Parse => "parse",
            Self::Suppress => "suppress",
            Self::Classify => "classify",
            Self::Density => "density",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A score tensor row was too short to carry geometry plus at least
    /// one class score.
    #[error("malformed score row: expected at least 5 values, got {got}")]
    Shape { got: usize },

    #[error("invalid frame geometry: {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("inference took {elapsed_ms} ms, budget was {budget_ms} ms")]
    InferenceTimeout { elapsed_ms: u64, budget_ms: u64 },

    #[error("{stage} stage failed: {cause}")]
    Stage { stage: Stage, cause: anyhow::Error },
}

impl PipelineError {
    pub fn stage(stage: Stage, cause: impl Into<anyhow::Error>) -> Self {
        Self::Stage {
            stage,
            cause: cause.into(),
        }
    }

    /// Stage tag for a wrapped failure, if this is one.
    pub fn failing_stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wrapping_preserves_inner_error() {
        let inner = PipelineError::Shape { got: 3 };
        let wrapped = PipelineError::stage(Stage::Parse, inner);

        assert_eq!(wrapped.failing_stage(), Some(Stage::Parse));
        let msg = wrapped.to_string();
        assert!(msg.contains("parse stage failed"));
        assert!(msg.contains("got 3"));
    }

    #[test]
    fn test_direct_errors_have_no_stage_tag() {
        let err = PipelineError::InvalidGeometry {
            width: 0,
            height: 480,
        };
        assert_eq!(err.failing_stage(), None);
    }
}
