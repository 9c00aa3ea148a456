//! Incremental statistics engine

use tracing::trace;

use crate::geo;
use crate::types::{GpsPoint, TrackerStats};

/// Maintains distance, active duration and pace as fixes and ticks arrive.
///
/// Pace is recomputed after every distance or duration update.
#[derive(Debug, Clone, Default)]
pub struct StatsEngine {
    stats: TrackerStats,
}

impl StatsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current totals
    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// Account for a newly recorded point.
    ///
    /// `previous` is the point before it in the same segment; `None` for the
    /// first point of a segment, which adds no distance.
    pub fn record_point(&mut self, previous: Option<&GpsPoint>, point: &GpsPoint) -> f64 {
        let Some(previous) = previous else {
            return 0.0;
        };
        let increment = geo::haversine_km(previous, point);
        self.add_distance(increment);
        increment
    }

    pub fn add_distance(&mut self, km: f64) {
        self.stats.distance_km += km;
        self.update_pace();
        trace!(increment_km = km, distance_km = self.stats.distance_km, "Distance updated");
    }

    /// Add active wall-clock time, in seconds
    pub fn add_elapsed(&mut self, seconds: f64) {
        self.stats.duration_seconds += seconds;
        self.update_pace();
    }

    pub fn reset(&mut self) {
        self.stats = TrackerStats::default();
    }

    fn update_pace(&mut self) {
        self.stats.pace_min_per_km =
            TrackerStats::pace_for(self.stats.distance_km, self.stats.duration_seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;
    use proptest::prelude::*;

    #[test]
    fn first_point_adds_nothing() {
        let mut engine = StatsEngine::new();
        let added = engine.record_point(None, &GpsPoint::new(0.0, 0.0, 0));
        assert_eq!(added, 0.0);
        assert_eq!(engine.stats(), TrackerStats::default());
    }

    #[test]
    fn pace_follows_both_distance_and_duration_updates() {
        let mut engine = StatsEngine::new();

        engine.add_distance(1.0);
        assert_eq!(engine.stats().pace_min_per_km, 0.0);

        engine.add_elapsed(300.0);
        assert!((engine.stats().pace_min_per_km - 5.0).abs() < 1e-12);

        engine.add_distance(1.0);
        assert!((engine.stats().pace_min_per_km - 2.5).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_totals() {
        let mut engine = StatsEngine::new();
        engine.add_distance(2.0);
        engine.add_elapsed(10.0);
        engine.reset();
        assert_eq!(engine.stats(), TrackerStats::default());
    }

    proptest! {
        #[test]
        fn prop_incremental_distance_matches_batch(
            steps in prop::collection::vec((-0.001f64..0.001, -0.001f64..0.001, any::<bool>()), 1..60)
        ) {
            let mut path = Path::new();
            let mut engine = StatsEngine::new();
            let (mut lat, mut lng) = (45.0, 7.0);

            for (i, (dlat, dlng, resume)) in steps.iter().enumerate() {
                if *resume && i > 0 {
                    path.start_new_segment();
                }
                lat += dlat;
                lng += dlng;
                let point = GpsPoint::new(lat, lng, i as i64 * 1000);
                let previous = path.record_point(point);
                engine.record_point(previous.as_ref(), &point);
                // Querying mid-stream must not disturb accumulation
                let _ = engine.stats();
            }

            prop_assert!((engine.stats().distance_km - path.length_km()).abs() < 1e-9);
        }
    }
}
