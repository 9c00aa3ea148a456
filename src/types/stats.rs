//! Live tracker statistics

use serde::{Deserialize, Serialize};

/// Derived statistics for a tracking session
///
/// `duration_seconds` counts active time only, with sub-second precision.
/// `distance_km` is kept at full precision; rounding happens when an
/// activity is finalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct TrackerStats {
    pub duration_seconds: f64,
    pub distance_km: f64,
    /// Minutes per kilometer, 0 when undefined
    pub pace_min_per_km: f64,
}

impl TrackerStats {
    /// Pace in minutes per kilometer for the given totals.
    ///
    /// Returns 0 when either total is zero or the quotient is not finite.
    pub fn pace_for(distance_km: f64, duration_seconds: f64) -> f64 {
        if distance_km > 0.0 && duration_seconds > 0.0 {
            let pace = (duration_seconds / 60.0) / distance_km;
            if pace.is_finite() { pace } else { 0.0 }
        } else {
            0.0
        }
    }
}
