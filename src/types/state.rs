//! Session lifecycle state and snapshots

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{GpsPoint, TrackerStats};
use crate::path::Path;

/// Lifecycle of a tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum TrackingState {
    #[default]
    Idle,
    Active,
    Paused,
    /// Terminal for this session instance
    Stopped,
}

impl TrackingState {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackingState::Idle => "idle",
            TrackingState::Active => "active",
            TrackingState::Paused => "paused",
            TrackingState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform fault surfaced on the session for display
///
/// Unlike [`crate::TrackerError`], faults are not returned from calls: they
/// are recorded on the session and read back through snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum SessionFault {
    /// No location capability on this platform; the session stays idle
    PlatformUnsupported,
    /// The user declined location access; tracking was stopped
    PermissionDenied,
    /// Any other positioning failure; tracking was stopped
    Positioning { message: String },
}

impl SessionFault {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            SessionFault::PlatformUnsupported => {
                "Geolocation is not supported on this device.".to_string()
            }
            SessionFault::PermissionDenied => {
                "Location access denied. Please enable it in your settings.".to_string()
            }
            SessionFault::Positioning { message } => format!("Location error: {}", message),
        }
    }
}

impl fmt::Display for SessionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

/// Point-in-time copy of a session, handed to display consumers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TrackingSnapshot {
    pub state: TrackingState,
    pub path: Path,
    pub stats: TrackerStats,
    pub error: Option<SessionFault>,
}

impl TrackingSnapshot {
    /// Active or paused
    pub fn is_tracking(&self) -> bool {
        matches!(self.state, TrackingState::Active | TrackingState::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.state == TrackingState::Paused
    }

    /// Chronological route across all segments
    pub fn flattened(&self) -> Vec<GpsPoint> {
        self.path.flatten()
    }

    /// Most recent recorded point, used to place the user marker
    pub fn last_point(&self) -> Option<&GpsPoint> {
        self.path.last_point()
    }
}
