//! Platform capability traits
//!
//! The session never touches a concrete geolocation or timer API. It is
//! handed a [`LocationSource`] and a [`Clock`], and the host delivers fixes
//! and ticks back to it tagged with the handle they were issued under.

use std::fmt;
use std::time::Duration;

use crate::config::WatchOptions;
use crate::types::LocationFix;

/// Handle of one continuous location subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle of one periodic duration timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Platform location failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl LocationErrorCode {
    /// Map a numeric geolocation error code (1, 2, 3)
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => LocationErrorCode::PermissionDenied,
            3 => LocationErrorCode::Timeout,
            _ => LocationErrorCode::PositionUnavailable,
        }
    }
}

/// Error reported by the platform on a live subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationError {
    pub code: LocationErrorCode,
    pub message: String,
}

impl LocationError {
    pub fn new(code: LocationErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn permission_denied() -> Self {
        Self::new(LocationErrorCode::PermissionDenied, "User denied Geolocation")
    }
}

/// Continuous location subscription capability
pub trait LocationSource {
    /// Whether the platform offers location at all
    fn is_available(&self) -> bool;

    /// Begin delivering fixes; each delivery is tagged with the returned id
    fn subscribe(&mut self, options: &WatchOptions) -> SubscriptionId;

    /// Stop delivering fixes for `subscription`. No fix tagged with it may
    /// be delivered after this returns.
    fn unsubscribe(&mut self, subscription: SubscriptionId);
}

/// Wall clock and periodic timer capability
pub trait Clock {
    /// Current wall-clock time, epoch milliseconds
    fn now_ms(&self) -> i64;

    /// Schedule a periodic tick
    fn start_interval(&mut self, period: Duration) -> TimerId;

    /// Cancel a periodic tick. No tick tagged with it may fire afterwards.
    fn cancel_interval(&mut self, timer: TimerId);
}

/// An event produced by a platform location subscription
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Fix { subscription: SubscriptionId, fix: LocationFix },
    Error { subscription: SubscriptionId, error: LocationError },
}

impl SourceEvent {
    pub fn subscription(&self) -> SubscriptionId {
        match self {
            SourceEvent::Fix { subscription, .. } | SourceEvent::Error { subscription, .. } => {
                *subscription
            }
        }
    }
}

/// Async stream of location events consumed by the driver task
///
/// Returns:
/// - `Some(event)` - a fix or error for some subscription
/// - `None` - the source has ended and will produce nothing more
#[async_trait::async_trait]
pub trait EventSource: Send + 'static {
    async fn next_event(&mut self) -> Option<SourceEvent>;
}
