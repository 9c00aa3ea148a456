//! GPS run tracking: path accumulation, live statistics and activity records.
//!
//! Stridelog turns a stream of location fixes into a segmented route, keeps
//! duration, distance and pace up to date while a run is tracked, and
//! packages the finished run as an [`OutdoorRunActivity`].
//!
//! # Features
//!
//! - **Pause-aware paths**: resuming starts a new segment, so no distance is
//!   counted across a pause
//! - **Testable core**: [`TrackingSession`] is a plain state machine over the
//!   injected [`LocationSource`] and [`Clock`] capabilities
//! - **Async handle**: [`TrackingConnection`] runs a session on a tokio task and
//!   publishes a fresh [`TrackingSnapshot`] after every event
//! - **Read model**: [`DailyLog`] and [`summary`] helpers for stored records
//!
//! ## Example
//!
//! ```rust,no_run
//! use stridelog::{LocationFix, TrackerConfig, TrackingConnection};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> stridelog::Result<()> {
//!     let (connection, feed) = TrackingConnection::with_feed(TrackerConfig::default())?;
//!     connection.start().await?;
//!
//!     feed.push_fix(LocationFix::new(51.5007, -0.1246, 1_700_000_000_000));
//!     feed.push_fix(LocationFix::new(51.5010, -0.1240, 1_700_000_005_000));
//!
//!     connection.stop(false).await?;
//!     let activity = connection.finalize("Lunch run").await?;
//!     println!("{} km in {} s", activity.distance_km, activity.duration_seconds);
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod config;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Tracking engine
pub mod finalize;
pub mod geo;
pub mod path;
pub mod session;
pub mod stats;

// Runtime architecture
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;

// Stored records
pub mod log;
pub mod summary;

// Core exports
pub use config::{TrackerConfig, WatchOptions};
pub use error::*;
pub use types::*;

// Main API exports
pub use connection::TrackingConnection;
pub use finalize::Finalizer;
pub use path::Path;
pub use provider::{
    Clock, EventSource, LocationError, LocationErrorCode, LocationSource, SourceEvent,
    SubscriptionId, TimerId,
};
pub use session::TrackingSession;
pub use stats::StatsEngine;

// Record exports
pub use log::{ActivityLog, DailyLog};
pub use summary::{ActivitySummary, LiveReadout};
