// src/source.rs
//
// Frame acquisition boundary. The pipeline never opens capture devices
// or decodes video; it consumes whatever a FrameSource hands it.

use crate::types::Frame;
use anyhow::Result;
use tracing::info;

/// External producer of decoded frames.
///
/// `Ok(None)` signals end-of-stream; it terminates the camera loop and
/// is not an error. Read failures on a live device should be mapped to
/// `Ok(None)` by the implementor when they mean "stream over".
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Deterministic stand-in for a capture device: emits a fixed number of
/// flat gray frames with evenly spaced timestamps. Used by the demo
/// binary and tests.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frame_interval_ms: f64,
    remaining: usize,
    emitted: usize,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, fps: f64, total_frames: usize) -> Self {
        info!(
            "Synthetic source: {}x{} @ {:.1} FPS, {} frames",
            width, height, fps, total_frames
        );
        Self {
            width,
            height,
            frame_interval_ms: 1000.0 / fps.max(1e-6),
            remaining: total_frames,
            emitted: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        let frame = Frame {
            data: vec![114u8; self.width as usize * self.height as usize * 3],
            width: self.width,
            height: self.height,
            timestamp_ms: self.emitted as f64 * self.frame_interval_ms,
        };
        self.emitted += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_source_exhausts() {
        let mut source = SyntheticSource::new(64, 48, 30.0, 3);

        let mut seen = 0;
        let mut last_ts = -1.0;
        while let Some(frame) = source.next_frame().unwrap() {
            assert_eq!(frame.width, 64);
            assert_eq!(frame.height, 48);
            assert_eq!(frame.data.len(), 64 * 48 * 3);
            assert!(frame.timestamp_ms > last_ts);
            last_ts = frame.timestamp_ms;
            seen += 1;
        }
        assert_eq!(seen, 3);

        // Stays exhausted
        assert!(source.next_frame().unwrap().is_none());
    }
}
