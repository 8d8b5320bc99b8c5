// src/classifier.rs
//
// Restricts deduplicated detections to the vehicle taxonomy. Anything
// a general-purpose model reports that is not a vehicle (pedestrians,
// traffic lights, ...) is dropped here, before counting.

use crate::types::Detection;
use std::collections::HashSet;

/// The closed set of labels this system counts as vehicles.
pub const VEHICLE_TAXONOMY: [&str; 5] = ["car", "truck", "bus", "motorcycle", "bicycle"];

/// Build the default taxonomy as an owned set.
pub fn default_taxonomy() -> HashSet<String> {
    VEHICLE_TAXONOMY.iter().map(|s| s.to_string()).collect()
}

/// Keep only detections whose label is in the taxonomy.
///
/// Pure filter: survivors are unmodified and keep their input order.
pub fn filter(detections: Vec<Detection>, taxonomy: &HashSet<String>) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|d| taxonomy.contains(&d.label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BBox;

    fn det(label: &str, confidence: f32) -> Detection {
        Detection {
            label: label.to_string(),
            confidence,
            bbox: BBox {
                x: 0.0,
                y: 0.0,
                w: 10.0,
                h: 10.0,
            },
        }
    }

    #[test]
    fn test_drops_non_vehicle_classes() {
        let dets = vec![det("person", 0.99), det("car", 0.6), det("traffic_light", 0.8)];
        let kept = filter(dets, &default_taxonomy());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].label, "car");
    }

    #[test]
    fn test_preserves_order_and_fields() {
        let dets = vec![det("truck", 0.7), det("person", 0.9), det("bus", 0.8)];
        let kept = filter(dets, &default_taxonomy());
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].label, "truck");
        assert_eq!(kept[0].confidence, 0.7);
        assert_eq!(kept[1].label, "bus");
    }

    #[test]
    fn test_custom_taxonomy() {
        let taxonomy: HashSet<String> = ["car"].iter().map(|s| s.to_string()).collect();
        let kept = filter(vec![det("car", 0.6), det("bus", 0.9)], &taxonomy);
        assert_eq!(kept.len(), 1);
    }
}
