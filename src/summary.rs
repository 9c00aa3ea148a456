//! Read model for displaying live stats and stored activities
//!
//! The formatting helpers produce the same strings the live tracking view and
//! the post-run summary show: elapsed time as `HH:MM:SS`, summary duration as
//! `MM:SS` under an hour, and pace as `m:ss`.

use serde::Serialize;
use uuid::Uuid;

use crate::geo::{RouteBounds, compute_bounds};
use crate::types::{OutdoorRunActivity, TrackerStats};

/// Live elapsed time as `HH:MM:SS`
pub fn format_elapsed(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Stored duration as `MM:SS`, or `HH:MM:SS` from one hour up
pub fn format_summary_duration(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 { format!("{:02}:{:02}:{:02}", h, m, s) } else { format!("{:02}:{:02}", m, s) }
}

/// Pace in minutes per kilometer as `m:ss`; `0:00` when there is no pace
pub fn format_pace(pace_min_per_km: f64) -> String {
    if !pace_min_per_km.is_finite() || pace_min_per_km <= 0.0 {
        return "0:00".to_string();
    }

    let mut minutes = pace_min_per_km.trunc() as u64;
    let mut seconds = ((pace_min_per_km - pace_min_per_km.trunc()) * 60.0).round() as u64;
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }
    format!("{}:{:02}", minutes, seconds)
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 { seconds.floor() as u64 } else { 0 }
}

/// Display strings for live stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct LiveReadout {
    pub elapsed: String,
    pub distance: String,
    pub pace: String,
}

impl From<&TrackerStats> for LiveReadout {
    fn from(stats: &TrackerStats) -> Self {
        Self {
            elapsed: format_elapsed(stats.duration_seconds),
            distance: format!("{:.2}", stats.distance_km),
            pace: format_pace(stats.pace_min_per_km),
        }
    }
}

/// Summary of a stored activity for the post-run screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub id: Uuid,
    pub name: String,
    pub distance_km: f64,
    pub duration_seconds: u64,
    pub pace_min_per_km: f64,
    pub duration_display: String,
    pub pace_display: String,
    pub point_count: usize,
    /// `None` when the route has no points
    pub bounds: Option<RouteBounds>,
}

impl From<&OutdoorRunActivity> for ActivitySummary {
    fn from(activity: &OutdoorRunActivity) -> Self {
        let pace = activity.pace_min_per_km();
        Self {
            id: activity.id,
            name: activity.name.clone(),
            distance_km: activity.distance_km,
            duration_seconds: activity.duration_seconds,
            pace_min_per_km: pace,
            duration_display: format_summary_duration(activity.duration_seconds),
            pace_display: format_pace(pace),
            point_count: activity.route.len(),
            bounds: compute_bounds(&activity.route),
        }
    }
}
