// src/telemetry.rs
//
// Assembles per-frame results into immutable CameraData records and
// keeps a bounded rolling history per camera. The aggregator is owned
// by one orchestrator instance; it is single-writer state, never a
// hidden global. Readers get cloned snapshots.

use crate::types::CameraData;
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::{debug, warn};

/// Default per-camera history cap; oldest entries are dropped first.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

pub struct TelemetryAggregator {
    histories: HashMap<u32, VecDeque<CameraData>>,
    capacity: usize,
}

impl TelemetryAggregator {
    /// `capacity` must be positive; it bounds each camera's history.
    pub fn new(capacity: usize) -> Self {
        Self {
            histories: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Build the frame's CameraData and append it to the camera's
    /// history, evicting the oldest entry when at capacity.
    ///
    /// `vehicle_count` is derived from `type_counts`, never supplied.
    /// Timestamps are expected to be strictly increasing per camera;
    /// a violation is logged and the record is still kept.
    pub fn record(
        &mut self,
        camera_id: u32,
        timestamp_ms: f64,
        type_counts: BTreeMap<String, usize>,
        traffic_density: f64,
    ) -> CameraData {
        let vehicle_count = type_counts.values().sum();

        let data = CameraData {
            camera_id,
            timestamp_ms,
            vehicle_count,
            vehicle_types: type_counts,
            traffic_density,
        };

        let history = self.histories.entry(camera_id).or_default();
        if let Some(last) = history.back() {
            if timestamp_ms <= last.timestamp_ms {
                warn!(
                    camera_id,
                    timestamp_ms, "non-monotonic telemetry timestamp for camera"
                );
            }
        }
        if history.len() >= self.capacity {
            history.pop_front();
        }
        history.push_back(data.clone());

        debug!(
            camera_id,
            vehicle_count, "Recorded telemetry ({} entries in history)",
            history.len()
        );
        data
    }

    /// Snapshot of the camera's history, oldest first. Unknown cameras
    /// yield an empty vector.
    pub fn history(&self, camera_id: u32) -> Vec<CameraData> {
        self.histories
            .get(&camera_id)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop all retained history for a camera (camera session ended).
    pub fn release(&mut self, camera_id: u32) {
        if self.histories.remove(&camera_id).is_some() {
            debug!(camera_id, "Released camera history");
        }
    }
}

impl Default for TelemetryAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn counts(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_vehicle_count_is_derived_from_type_counts() {
        let mut agg = TelemetryAggregator::default();
        let data = agg.record(1, 0.0, counts(&[("car", 8), ("truck", 1), ("bus", 1)]), 0.01);
        assert_eq!(data.vehicle_count, 10);
    }

    #[test]
    fn test_count_sum_invariant_over_random_histograms() {
        let mut rng = rand::thread_rng();
        let mut agg = TelemetryAggregator::default();

        for i in 0..100u32 {
            let histogram = counts(&[
                ("car", rng.gen_range(0..20)),
                ("truck", rng.gen_range(0..5)),
                ("bus", rng.gen_range(0..3)),
                ("motorcycle", rng.gen_range(0..7)),
            ]);
            let expected: usize = histogram.values().sum();

            let data = agg.record(7, i as f64, histogram, 0.0);
            assert_eq!(data.vehicle_count, expected);
            assert_eq!(data.vehicle_types.values().sum::<usize>(), data.vehicle_count);
        }
    }

    #[test]
    fn test_history_is_ordered_oldest_first() {
        let mut agg = TelemetryAggregator::default();
        for i in 0..5 {
            agg.record(3, i as f64 * 33.3, counts(&[("car", i)]), 0.0);
        }

        let history = agg.history(3);
        assert_eq!(history.len(), 5);
        for (i, entry) in history.iter().enumerate() {
            assert_eq!(entry.vehicle_count, i);
        }
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut agg = TelemetryAggregator::new(3);
        for i in 0..5 {
            agg.record(1, i as f64, counts(&[("car", i)]), 0.0);
        }

        let history = agg.history(1);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].vehicle_count, 2);
        assert_eq!(history[2].vehicle_count, 4);
    }

    #[test]
    fn test_cameras_have_independent_histories() {
        let mut agg = TelemetryAggregator::default();
        agg.record(1, 0.0, counts(&[("car", 1)]), 0.0);
        agg.record(2, 0.0, counts(&[("bus", 2)]), 0.0);
        agg.record(1, 33.3, counts(&[("car", 3)]), 0.0);

        assert_eq!(agg.history(1).len(), 2);
        assert_eq!(agg.history(2).len(), 1);
        assert!(agg.history(9).is_empty());
    }

    #[test]
    fn test_release_clears_history() {
        let mut agg = TelemetryAggregator::default();
        agg.record(1, 0.0, counts(&[("car", 1)]), 0.0);
        agg.release(1);
        assert!(agg.history(1).is_empty());
    }
}
