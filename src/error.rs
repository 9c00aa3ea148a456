//! Error types for run tracking.
//!
//! All errors implement `std::error::Error` and carry enough context to show
//! a useful message or decide on recovery.
//!
//! ## Error Categories
//!
//! - **Platform Errors**: location capability missing, permission denied, positioning failures
//! - **Lifecycle Errors**: an operation called from a state that does not allow it
//! - **Finalization Errors**: activity too short to be worth saving
//! - **Persistence Errors**: duplicate records in a day log
//! - **Configuration Errors**: unreadable or invalid config files
//!
//! Platform problems that happen *during* a session are also surfaced on the
//! session itself as a [`crate::SessionFault`]; see [`TrackerError::from`].
//!
//! ## Recovery
//!
//! ```rust
//! use stridelog::TrackerError;
//!
//! let error = TrackerError::activity_too_short(0.004, 0.01);
//! assert!(!error.is_retryable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::types::{SessionFault, TrackingState};

/// Result type alias for tracking operations.
pub type Result<T, E = TrackerError> = std::result::Result<T, E>;

/// Main error type for tracking operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TrackerError {
    #[error("Location tracking is not supported on this platform")]
    PlatformUnsupported,

    #[error("Location access denied")]
    PermissionDenied,

    #[error("Positioning failed: {message}")]
    Positioning { message: String },

    #[error("Activity too short to save: {distance_km:.3} km (minimum {minimum_km} km)")]
    ActivityTooShort { distance_km: f64, minimum_km: f64 },

    #[error("Cannot {operation} while {state}")]
    InvalidTransition { operation: &'static str, state: TrackingState },

    #[error("Activity {id} is already in the log")]
    DuplicateActivity { id: Uuid },

    #[error("Invalid configuration in {context}: {details}")]
    Config { context: String, details: String },

    #[error("Config file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tracking task unavailable: {context}")]
    ChannelClosed { context: String },
}

impl TrackerError {
    /// Returns whether retrying the same operation can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            TrackerError::PlatformUnsupported => false,
            TrackerError::PermissionDenied => true,
            TrackerError::Positioning { .. } => true,
            TrackerError::ActivityTooShort { .. } => false,
            TrackerError::InvalidTransition { .. } => false,
            TrackerError::DuplicateActivity { .. } => false,
            TrackerError::Config { .. } => false,
            TrackerError::File { .. } => true,
            TrackerError::ChannelClosed { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TrackerError::PlatformUnsupported => vec![
                "Use a device or browser with location services",
                "Log the run manually instead",
            ],
            TrackerError::PermissionDenied => vec![
                "Enable location access in the device settings",
                "Start a new session after granting permission",
            ],
            TrackerError::Positioning { .. } => vec![
                "Move to an area with a clear view of the sky",
                "Check that location services are switched on",
                "Start a new session",
            ],
            TrackerError::ActivityTooShort { .. } => vec![
                "Discard this session",
                "Keep tracking until the minimum distance is covered",
            ],
            TrackerError::InvalidTransition { .. } => vec![
                "Check the session state before calling lifecycle methods",
                "Reset a stopped session before starting again",
            ],
            TrackerError::DuplicateActivity { .. } => {
                vec!["Finalize a new activity instead of re-saving an existing one"]
            }
            TrackerError::Config { .. } => vec![
                "Check the config file against the documented keys",
                "Remove the offending key to use its default",
            ],
            TrackerError::File { .. } => {
                vec!["Check the config file exists and is readable", "Check file permissions"]
            }
            TrackerError::ChannelClosed { .. } => vec![
                "Create a new tracking connection",
                "Make sure a tokio runtime is running",
            ],
        }
    }

    /// Helper constructor for too-short activities.
    pub fn activity_too_short(distance_km: f64, minimum_km: f64) -> Self {
        TrackerError::ActivityTooShort { distance_km, minimum_km }
    }

    /// Helper constructor for lifecycle misuse.
    pub fn invalid_transition(operation: &'static str, state: TrackingState) -> Self {
        TrackerError::InvalidTransition { operation, state }
    }

    /// Helper constructor for a record appended twice.
    pub fn duplicate_activity(id: Uuid) -> Self {
        TrackerError::DuplicateActivity { id }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        TrackerError::Config { context: context.into(), details: details.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TrackerError::File { path, source }
    }

    /// Helper constructor for a stopped driver task.
    pub fn channel_closed(context: impl Into<String>) -> Self {
        TrackerError::ChannelClosed { context: context.into() }
    }
}

impl From<SessionFault> for TrackerError {
    fn from(fault: SessionFault) -> Self {
        match fault {
            SessionFault::PlatformUnsupported => TrackerError::PlatformUnsupported,
            SessionFault::PermissionDenied => TrackerError::PermissionDenied,
            SessionFault::Positioning { message } => TrackerError::Positioning { message },
        }
    }
}
