// src/parser.rs
//
// Turns raw inference output into candidate detections. Each tensor row
// encodes [cx, cy, w, h, class_score_0, class_score_1, ...] with
// geometry normalized to 0..1. Rows are kept only when their best class
// score strictly exceeds the confidence threshold.

use crate::error::PipelineError;
use crate::types::{BBox, Detection};
use ndarray::Array2;
use tracing::debug;

/// Geometry columns preceding the per-class scores.
const GEOMETRY_COLS: usize = 4;

/// Parse score tensors into candidate detections.
///
/// Geometry is de-normalized against the frame dimensions and converted
/// from center+size to a top-left bbox clamped into the frame. Output
/// length is at most the total row count; every emitted detection has
/// `confidence > confidence_threshold`.
pub fn parse(
    tensors: &[Array2<f32>],
    frame_width: u32,
    frame_height: u32,
    confidence_threshold: f32,
    class_names: &[String],
) -> Result<Vec<Detection>, PipelineError> {
    let fw = frame_width as f32;
    let fh = frame_height as f32;
    let mut detections = Vec::new();

    for tensor in tensors {
        if tensor.ncols() < GEOMETRY_COLS + 1 {
            return Err(PipelineError::Shape {
                got: tensor.ncols(),
            });
        }

        for row in tensor.rows() {
            let mut best_class = 0usize;
            let mut best_score = f32::NEG_INFINITY;
            for (idx, &score) in row.iter().skip(GEOMETRY_COLS).enumerate() {
                if score > best_score {
                    best_score = score;
                    best_class = idx;
                }
            }

            if best_score <= confidence_threshold {
                continue;
            }

            let cx = row[0] * fw;
            let cy = row[1] * fh;
            let w = row[2] * fw;
            let h = row[3] * fh;

            // Center+size to corners, clamped into the frame.
            let x1 = (cx - w / 2.0).max(0.0);
            let y1 = (cy - h / 2.0).max(0.0);
            let x2 = (cx + w / 2.0).min(fw);
            let y2 = (cy + h / 2.0).min(fh);

            detections.push(Detection {
                label: class_name(class_names, best_class),
                confidence: best_score,
                bbox: BBox {
                    x: x1,
                    y: y1,
                    w: x2 - x1,
                    h: y2 - y1,
                },
            });
        }
    }

    debug!(
        "Parsed {} candidate detections above threshold {:.2}",
        detections.len(),
        confidence_threshold
    );
    Ok(detections)
}

fn class_name(class_names: &[String], idx: usize) -> String {
    class_names
        .get(idx)
        .cloned()
        .unwrap_or_else(|| format!("class_{idx}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn labels() -> Vec<String> {
        ["person", "car", "truck"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn single_car_row() -> Array2<f32> {
        // Centered 0.2x0.2 box, car score 0.9
        arr2(&[[0.5, 0.5, 0.2, 0.2, 0.1, 0.9, 0.05]])
    }

    #[test]
    fn test_denormalizes_center_box() {
        let dets = parse(&[single_car_row()], 1000, 1000, 0.5, &labels()).unwrap();
        assert_eq!(dets.len(), 1);

        let det = &dets[0];
        assert_eq!(det.label, "car");
        assert!((det.confidence - 0.9).abs() < 1e-6);
        assert!((det.bbox.x - 400.0).abs() < 1e-3);
        assert!((det.bbox.y - 400.0).abs() < 1e-3);
        assert!((det.bbox.w - 200.0).abs() < 1e-3);
        assert!((det.bbox.h - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_confidence_filter_is_strict() {
        // Best score exactly at the threshold must be dropped
        let tensor = arr2(&[[0.5, 0.5, 0.2, 0.2, 0.1, 0.5, 0.05]]);
        let dets = parse(&[tensor], 1000, 1000, 0.5, &labels()).unwrap();
        assert!(dets.is_empty());
    }

    #[test]
    fn test_raising_threshold_never_adds_detections() {
        let tensor = arr2(&[
            [0.5, 0.5, 0.2, 0.2, 0.1, 0.9, 0.05],
            [0.3, 0.3, 0.1, 0.1, 0.6, 0.2, 0.1],
            [0.7, 0.7, 0.1, 0.1, 0.2, 0.55, 0.3],
            [0.2, 0.8, 0.1, 0.1, 0.05, 0.1, 0.45],
        ]);

        let mut prev = usize::MAX;
        for threshold in [0.1f32, 0.3, 0.5, 0.7, 0.9] {
            let n = parse(&[tensor.clone()], 640, 480, threshold, &labels())
                .unwrap()
                .len();
            assert!(n <= prev, "threshold {threshold} grew output");
            prev = n;
        }
    }

    #[test]
    fn test_bbox_clamped_into_frame() {
        // Box centered near the origin spills outside the frame
        let tensor = arr2(&[[0.05, 0.05, 0.3, 0.3, 0.1, 0.9, 0.05]]);
        let dets = parse(&[tensor], 100, 100, 0.5, &labels()).unwrap();
        let b = dets[0].bbox;
        assert_eq!(b.x, 0.0);
        assert_eq!(b.y, 0.0);
        assert!(b.x + b.w <= 100.0);
        assert!(b.y + b.h <= 100.0);
    }

    #[test]
    fn test_row_without_class_scores_is_shape_error() {
        let tensor = Array2::<f32>::zeros((2, 4));
        let err = parse(&[tensor], 640, 480, 0.5, &labels()).unwrap_err();
        assert!(matches!(err, PipelineError::Shape { got: 4 }));
    }

    #[test]
    fn test_unknown_class_index_gets_placeholder_label() {
        let tensor = arr2(&[[0.5, 0.5, 0.2, 0.2, 0.1, 0.2, 0.1, 0.95]]);
        let dets = parse(&[tensor], 640, 480, 0.5, &labels()).unwrap();
        assert_eq!(dets[0].label, "class_3");
    }

    #[test]
    fn test_multiple_tensors_concatenate() {
        let dets = parse(
            &[single_car_row(), single_car_row()],
            1000,
            1000,
            0.5,
            &labels(),
        )
        .unwrap();
        assert_eq!(dets.len(), 2);
    }
}
