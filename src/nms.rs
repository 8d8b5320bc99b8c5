// src/nms.rs
//
// Non-maximum suppression: collapse overlapping candidates for the
// same object into the single highest-confidence box. Suppression only
// happens within a class; a bus box never suppresses a car box.

use crate::types::Detection;
use std::cmp::Ordering;
use tracing::debug;

/// Suppress same-class detections whose IoU with a higher-confidence
/// survivor exceeds `iou_threshold`.
///
/// Candidates are visited in descending confidence order; equal
/// confidences are broken by input position, earlier wins, so the
/// result is deterministic. Output is a subset of the input, ordered by
/// selection.
pub fn suppress(detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    if detections.is_empty() {
        return detections;
    }

    // Stable sort keeps input order on confidence ties.
    let mut order: Vec<usize> = (0..detections.len()).collect();
    order.sort_by(|&a, &b| {
        detections[b]
            .confidence
            .partial_cmp(&detections[a].confidence)
            .unwrap_or(Ordering::Equal)
    });

    let input_len = detections.len();
    let mut removed = vec![false; input_len];
    let mut kept_indices = Vec::new();

    for pos in 0..order.len() {
        let i = order[pos];
        if removed[i] {
            continue;
        }
        kept_indices.push(i);

        for &j in &order[pos + 1..] {
            if removed[j] || detections[j].label != detections[i].label {
                continue;
            }
            if detections[i].bbox.iou(&detections[j].bbox) > iou_threshold {
                removed[j] = true;
            }
        }
    }

    let mut slots: Vec<Option<Detection>> = detections.into_iter().map(Some).collect();
    let kept: Vec<Detection> = kept_indices
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect();

    if kept.len() < input_len {
        debug!(
            "Suppressed {} of {} candidate detections",
            input_len - kept.len(),
            input_len
        );
    }
    kept
}
