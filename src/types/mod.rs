//! Core data types for run tracking.
//!
//! - [`GpsPoint`] is one recorded fix; [`LocationFix`] is the platform's view of it
//! - [`TrackerStats`] holds live duration, distance and pace
//! - [`TrackingState`], [`SessionFault`] and [`TrackingSnapshot`] describe a session
//! - [`OutdoorRunActivity`] is the finalized record handed to persistence

mod activity;
mod point;
mod state;
mod stats;

pub use activity::OutdoorRunActivity;
pub use point::{GpsPoint, LocationFix};
pub use state::{SessionFault, TrackingSnapshot, TrackingState};
pub use stats::TrackerStats;
