// src/density.rs
//
// Reduces a frame's surviving detections into the density metric and a
// per-type histogram. Density is vehicle count over frame pixel area,
// a relative congestion proxy rather than a physical quantity.

use crate::error::PipelineError;
use crate::types::Detection;
use std::collections::BTreeMap;

/// Density plus per-label counts for one frame.
///
/// `type_counts` contains only labels that were observed; taxonomy
/// members with zero sightings are omitted. Fails on a zero-area frame
/// rather than producing NaN.
pub fn estimate(
    detections: &[Detection],
    frame_width: u32,
    frame_height: u32,
) -> Result<(f64, BTreeMap<String, usize>), PipelineError> {
    if frame_width == 0 || frame_height == 0 {
        return Err(PipelineError::InvalidGeometry {
            width: frame_width,
            height: frame_height,
        });
    }

    let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
    for det in detections {
        *type_counts.entry(det.label.clone()).or_insert(0) += 1;
    }

    let frame_area = frame_width as f64 * frame_height as f64;
    let density = detections.len() as f64 / frame_area;

    Ok((density, type_counts))
}
