// src/types.rs

use serde::Serialize;
use std::collections::BTreeMap;

/// A single decoded video frame, RGB byte order, row-major.
///
/// Produced by a `FrameSource`; the pipeline never decodes video itself.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp_ms: f64,
}

/// Axis-aligned bounding box in pixel space, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BBox {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Intersection-over-union with another box. Returns 0.0 for
    /// degenerate (zero-area) unions.
    pub fn iou(&self, other: &BBox) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.w).min(other.x + other.w);
        let y2 = (self.y + self.h).min(other.y + other.h);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

/// One localized, typed, confidence-scored sighting.
///
/// Created fresh for each frame and dropped once the frame's
/// `CameraData` has been produced; never retained across frames.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BBox,
}

/// Per-frame telemetry record for one camera.
///
/// Immutable once built. `vehicle_types` holds only labels that were
/// actually observed in the frame; taxonomy members with zero sightings
/// are omitted. `vehicle_count` always equals the sum of the counts.
#[derive(Debug, Clone, Serialize)]
pub struct CameraData {
    pub camera_id: u32,
    pub timestamp_ms: f64,
    pub vehicle_count: usize,
    pub vehicle_types: BTreeMap<String, usize>,
    pub traffic_density: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_center() {
        let b = BBox {
            x: 400.0,
            y: 400.0,
            w: 200.0,
            h: 200.0,
        };
        assert_eq!(b.center(), (500.0, 500.0));
    }

    #[test]
    fn test_iou_identical_boxes() {
        let b = BBox {
            x: 10.0,
            y: 10.0,
            w: 50.0,
            h: 50.0,
        };
        assert!((b.iou(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_disjoint_boxes() {
        let a = BBox {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        };
        let b = BBox {
            x: 100.0,
            y: 100.0,
            w: 10.0,
            h: 10.0,
        };
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_half_overlap() {
        // Two 10x10 boxes sharing a 5x10 strip: 50 / (100 + 100 - 50)
        let a = BBox {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        };
        let b = BBox {
            x: 5.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        };
        assert!((a.iou(&b) - 50.0 / 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_zero_area_boxes() {
        let a = BBox {
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
        };
        assert_eq!(a.iou(&a), 0.0);
    }
}
