//! Finalized outdoor run record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GpsPoint;

/// Immutable record of a completed outdoor run
///
/// Produced once by the finalizer and then owned by the day's activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct OutdoorRunActivity {
    pub id: Uuid,
    pub name: String,
    /// When the user confirmed saving
    pub recorded_at: DateTime<Utc>,
    /// Active time, whole seconds
    pub duration_seconds: u64,
    /// Distance rounded to 2 decimals
    pub distance_km: f64,
    /// Flattened route in chronological order
    pub route: Vec<GpsPoint>,
}

impl OutdoorRunActivity {
    /// Average pace of the stored record in minutes per kilometer
    pub fn pace_min_per_km(&self) -> f64 {
        super::TrackerStats::pace_for(self.distance_km, self.duration_seconds as f64)
    }
}
