//! Test doubles for the platform capabilities
//!
//! [`FakeLocationSource`] and [`ManualClock`] share their state between
//! clones, so a test can hand one clone to a session and keep another to
//! inspect subscriptions or move time forward.

#![cfg(any(test, feature = "benchmark"))]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::WatchOptions;
use crate::provider::{Clock, LocationSource, SubscriptionId, TimerId};
use crate::types::LocationFix;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct SourceState {
    unavailable: bool,
    next_id: u64,
    active: Vec<SubscriptionId>,
    subscribe_calls: usize,
    last_options: Option<WatchOptions>,
}

/// In-memory location source recording subscribe/unsubscribe calls
#[derive(Debug, Clone, Default)]
pub struct FakeLocationSource {
    state: Arc<Mutex<SourceState>>,
}

impl FakeLocationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source for a platform without location services
    pub fn unavailable() -> Self {
        let source = Self::default();
        lock(&source.state).unavailable = true;
        source
    }

    pub fn set_available(&self, available: bool) {
        lock(&self.state).unavailable = !available;
    }

    pub fn active_subscriptions(&self) -> Vec<SubscriptionId> {
        lock(&self.state).active.clone()
    }

    pub fn subscribe_calls(&self) -> usize {
        lock(&self.state).subscribe_calls
    }

    pub fn last_options(&self) -> Option<WatchOptions> {
        lock(&self.state).last_options
    }
}

impl LocationSource for FakeLocationSource {
    fn is_available(&self) -> bool {
        !lock(&self.state).unavailable
    }

    fn subscribe(&mut self, options: &WatchOptions) -> SubscriptionId {
        let mut state = lock(&self.state);
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state.active.push(id);
        state.subscribe_calls += 1;
        state.last_options = Some(*options);
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        lock(&self.state).active.retain(|id| *id != subscription);
    }
}

#[derive(Debug, Default)]
struct ClockState {
    now_ms: i64,
    next_id: u64,
    active: Vec<(TimerId, Duration)>,
}

/// Clock whose time only moves when a test advances it
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Arc<Mutex<ClockState>>,
}

impl ManualClock {
    pub fn starting_at(now_ms: i64) -> Self {
        let clock = Self::default();
        lock(&clock.state).now_ms = now_ms;
        clock
    }

    pub fn advance(&self, by: Duration) {
        lock(&self.state).now_ms += by.as_millis() as i64;
    }

    pub fn active_timers(&self) -> Vec<TimerId> {
        lock(&self.state).active.iter().map(|(id, _)| *id).collect()
    }

    pub fn period_of(&self, timer: TimerId) -> Option<Duration> {
        lock(&self.state).active.iter().find(|(id, _)| *id == timer).map(|(_, p)| *p)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        lock(&self.state).now_ms
    }

    fn start_interval(&mut self, period: Duration) -> TimerId {
        let mut state = lock(&self.state);
        state.next_id += 1;
        let id = TimerId(state.next_id);
        state.active.push((id, period));
        id
    }

    fn cancel_interval(&mut self, timer: TimerId) {
        lock(&self.state).active.retain(|(id, _)| *id != timer);
    }
}

/// A fix heading east along the equator, `step` millidegrees per fix
pub fn equator_fix(step: u32, at_ms: i64) -> LocationFix {
    LocationFix::new(0.0, f64::from(step) * 0.001, at_ms)
}

/// A straight synthetic route of `count` fixes spaced `interval_ms` apart
pub fn straight_route(count: u32, start_ms: i64, interval_ms: i64) -> Vec<LocationFix> {
    (0..count).map(|i| equator_fix(i, start_ms + i64::from(i) * interval_ms)).collect()
}
