//! Activity finalization
//!
//! Turns the totals and route of a stopped session into an immutable
//! [`OutdoorRunActivity`]. Persistence is left to the caller.

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::types::{GpsPoint, OutdoorRunActivity, TrackerStats};
use crate::{Result, TrackerError};

/// Builds activity records from finished sessions
#[derive(Debug, Clone, PartialEq)]
pub struct Finalizer {
    min_distance_km: f64,
    name_prefix: String,
}

impl Default for Finalizer {
    fn default() -> Self {
        Self::from_config(&TrackerConfig::default())
    }
}

impl Finalizer {
    pub fn new(min_distance_km: f64, name_prefix: impl Into<String>) -> Self {
        Self { min_distance_km, name_prefix: name_prefix.into() }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.min_save_distance_km, config.default_name_prefix.clone())
    }

    pub fn min_distance_km(&self) -> f64 {
        self.min_distance_km
    }

    /// Package a finished session as an activity record.
    ///
    /// A blank `name` is replaced with `"{prefix} {date}"` using the local
    /// date of `recorded_at`.
    ///
    /// # Errors
    ///
    /// [`TrackerError::ActivityTooShort`] when the distance is below the
    /// configured minimum. The caller should offer to discard the session.
    pub fn finalize(
        &self,
        stats: &TrackerStats,
        route: Vec<GpsPoint>,
        name: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<OutdoorRunActivity> {
        // Fails closed: a NaN distance or minimum never compares as long enough
        let long_enough = stats.distance_km >= self.min_distance_km;
        if !long_enough {
            debug!(
                distance_km = stats.distance_km,
                minimum_km = self.min_distance_km,
                "Rejecting short activity"
            );
            return Err(TrackerError::activity_too_short(stats.distance_km, self.min_distance_km));
        }

        let name = match name.trim() {
            "" => self.generated_name(recorded_at),
            _ => name.to_string(),
        };

        let activity = OutdoorRunActivity {
            id: Uuid::new_v4(),
            name,
            recorded_at,
            duration_seconds: stats.duration_seconds.max(0.0).round() as u64,
            distance_km: round_to_hundredths(stats.distance_km),
            route,
        };

        info!(
            id = %activity.id,
            name = %activity.name,
            distance_km = activity.distance_km,
            duration_seconds = activity.duration_seconds,
            points = activity.route.len(),
            "Finalized outdoor run"
        );

        Ok(activity)
    }

    fn generated_name(&self, recorded_at: DateTime<Utc>) -> String {
        let date = recorded_at.with_timezone(&Local).date_naive();
        format!("{} {}", self.name_prefix, date.format("%Y-%m-%d"))
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
