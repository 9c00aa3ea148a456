//! Tracking session state machine
//!
//! ```text
//! Idle --start--> Active --pause--> Paused --resume--> Active
//!                   |                  |
//!                   +------stop--------+--> Stopped --reset--> Idle
//! ```
//!
//! The session owns the location subscription and the duration timer. Both
//! are created and torn down only by lifecycle methods; fixes and ticks are
//! handed back in by the host tagged with the handle they were issued under,
//! and anything carrying a stale handle is dropped.
//!
//! Every mutating call returns a fresh [`TrackingSnapshot`].

use chrono::Utc;
use tracing::{debug, info, trace, warn};

use crate::config::TrackerConfig;
use crate::finalize::Finalizer;
use crate::path::Path;
use crate::provider::{
    Clock, LocationError, LocationErrorCode, LocationSource, SubscriptionId, TimerId,
};
use crate::stats::StatsEngine;
use crate::types::{
    GpsPoint, LocationFix, OutdoorRunActivity, SessionFault, TrackingSnapshot, TrackingState,
};
use crate::{Result, TrackerError};

/// One outdoor-run tracking session
///
/// Dropping the session releases its subscription and timer.
pub struct TrackingSession<L: LocationSource, C: Clock> {
    source: L,
    clock: C,
    config: TrackerConfig,
    finalizer: Finalizer,

    state: TrackingState,
    path: Path,
    stats: StatsEngine,
    error: Option<SessionFault>,

    subscription: Option<SubscriptionId>,
    timer: Option<TimerId>,
    /// Wall-clock time of the previous tick, epoch milliseconds
    last_tick_at: Option<i64>,
}

impl<L, C> TrackingSession<L, C>
where
    L: LocationSource,
    C: Clock,
{
    /// Create an idle session.
    ///
    /// # Errors
    ///
    /// [`TrackerError::Config`] when `config` fails [`TrackerConfig::validate`],
    /// e.g. a zero tick interval or a non-finite minimum distance.
    pub fn new(source: L, clock: C, config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        let finalizer = Finalizer::from_config(&config);
        Ok(Self {
            source,
            clock,
            config,
            finalizer,
            state: TrackingState::Idle,
            path: Path::new(),
            stats: StatsEngine::new(),
            error: None,
            subscription: None,
            timer: None,
            last_tick_at: None,
        })
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Subscription currently receiving fixes, if any
    pub fn active_subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    /// Timer currently accruing duration, if any
    pub fn active_timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn snapshot(&self) -> TrackingSnapshot {
        TrackingSnapshot {
            state: self.state,
            path: self.path.clone(),
            stats: self.stats.stats(),
            error: self.error.clone(),
        }
    }

    /// Begin a session from Idle.
    ///
    /// Without a location capability the session stays Idle and the
    /// returned snapshot carries [`SessionFault::PlatformUnsupported`].
    pub fn start(&mut self) -> Result<TrackingSnapshot> {
        self.require("start", &[TrackingState::Idle])?;

        if !self.source.is_available() {
            warn!("Location capability unavailable, staying idle");
            self.error = Some(SessionFault::PlatformUnsupported);
            return Ok(self.snapshot());
        }

        self.error = None;
        self.path = Path::new();
        self.stats.reset();
        self.begin_collection();
        self.state = TrackingState::Active;

        info!(subscription = ?self.subscription, timer = ?self.timer, "Tracking started");
        Ok(self.snapshot())
    }

    /// Suspend collection; recorded path and stats are kept as-is
    pub fn pause(&mut self) -> Result<TrackingSnapshot> {
        self.require("pause", &[TrackingState::Active])?;
        self.end_collection();
        self.state = TrackingState::Paused;

        info!(distance_km = self.stats.stats().distance_km, "Tracking paused");
        Ok(self.snapshot())
    }

    /// Continue collecting into a new path segment
    pub fn resume(&mut self) -> Result<TrackingSnapshot> {
        self.require("resume", &[TrackingState::Paused])?;
        self.path.start_new_segment();
        self.begin_collection();
        self.state = TrackingState::Active;

        info!(segments = self.path.segments().len(), "Tracking resumed");
        Ok(self.snapshot())
    }

    /// End the session. With `discard`, path and stats are cleared.
    pub fn stop(&mut self, discard: bool) -> Result<TrackingSnapshot> {
        self.require("stop", &[TrackingState::Active, TrackingState::Paused])?;
        self.halt(discard);
        Ok(self.snapshot())
    }

    /// Return a stopped session to Idle so it can be started again
    pub fn reset(&mut self) -> Result<TrackingSnapshot> {
        self.require("reset", &[TrackingState::Idle, TrackingState::Stopped])?;
        self.path = Path::new();
        self.stats.reset();
        self.error = None;
        self.state = TrackingState::Idle;

        debug!("Session reset");
        Ok(self.snapshot())
    }

    /// Deliver a platform fix
    pub fn on_fix(&mut self, subscription: SubscriptionId, fix: LocationFix) -> TrackingSnapshot {
        if self.subscription != Some(subscription) || self.state != TrackingState::Active {
            trace!(%subscription, state = %self.state, "Dropping fix for inactive subscription");
            return self.snapshot();
        }

        let point = GpsPoint::from(fix);
        if let Some(last) = self.path.last_point() {
            if point.timestamp < last.timestamp {
                warn!(
                    previous = last.timestamp,
                    current = point.timestamp,
                    "Fix delivered out of order"
                );
            }
        }

        let previous = self.path.record_point(point);
        let increment = self.stats.record_point(previous.as_ref(), &point);

        trace!(
            lat = point.lat,
            lng = point.lng,
            increment_km = increment,
            "Recorded fix"
        );
        self.snapshot()
    }

    /// Deliver a platform error; stops tracking and keeps collected data
    pub fn on_location_error(
        &mut self,
        subscription: SubscriptionId,
        error: LocationError,
    ) -> TrackingSnapshot {
        if self.subscription != Some(subscription) {
            trace!(%subscription, "Dropping error for inactive subscription");
            return self.snapshot();
        }

        let fault = match error.code {
            LocationErrorCode::PermissionDenied => SessionFault::PermissionDenied,
            LocationErrorCode::PositionUnavailable | LocationErrorCode::Timeout => {
                SessionFault::Positioning { message: error.message.clone() }
            }
        };
        warn!(code = ?error.code, message = %error.message, "Location error, stopping session");

        self.error = Some(fault);
        self.halt(false);
        self.snapshot()
    }

    /// Deliver a timer tick; accrues the wall-clock time since the last one
    pub fn on_tick(&mut self, timer: TimerId) -> TrackingSnapshot {
        if self.timer != Some(timer) || self.state != TrackingState::Active {
            trace!(%timer, "Dropping tick for inactive timer");
            return self.snapshot();
        }

        let now = self.clock.now_ms();
        let last = self.last_tick_at.unwrap_or(now);
        self.last_tick_at = Some(now);

        let elapsed = (now - last) as f64 / 1000.0;
        if elapsed > 0.0 {
            self.stats.add_elapsed(elapsed);
        }

        trace!(elapsed, duration = self.stats.stats().duration_seconds, "Tick");
        self.snapshot()
    }

    /// Package a stopped session as an activity record.
    ///
    /// The session stays Stopped; on [`TrackerError::ActivityTooShort`] the
    /// caller should discard it.
    pub fn finalize(&self, name: &str) -> Result<OutdoorRunActivity> {
        self.require("finalize", &[TrackingState::Stopped])?;
        self.finalizer.finalize(&self.stats.stats(), self.path.flatten(), name, Utc::now())
    }

    fn require(&self, operation: &'static str, allowed: &[TrackingState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            debug!(operation, state = %self.state, "Rejected lifecycle call");
            Err(TrackerError::invalid_transition(operation, self.state))
        }
    }

    fn begin_collection(&mut self) {
        self.subscription = Some(self.source.subscribe(&self.config.watch));
        self.last_tick_at = Some(self.clock.now_ms());
        self.timer = Some(self.clock.start_interval(self.config.tick_interval()));
    }

    fn end_collection(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.source.unsubscribe(subscription);
        }
        if let Some(timer) = self.timer.take() {
            self.clock.cancel_interval(timer);
        }
        self.last_tick_at = None;
    }

    fn halt(&mut self, discard: bool) {
        self.end_collection();
        self.state = TrackingState::Stopped;
        if discard {
            self.path = Path::new();
            self.stats.reset();
        }

        let stats = self.stats.stats();
        info!(
            discard,
            distance_km = stats.distance_km,
            duration_seconds = stats.duration_seconds,
            points = self.path.point_count(),
            "Tracking stopped"
        );
    }
}

impl<L: LocationSource, C: Clock> Drop for TrackingSession<L, C> {
    fn drop(&mut self) {
        if self.subscription.is_some() || self.timer.is_some() {
            debug!("Dropping session with live subscription or timer");
            self.end_collection();
        }
    }
}
