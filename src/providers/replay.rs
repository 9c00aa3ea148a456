//! Replay of a stored route through the live tracking pipeline
//!
//! Points are released at their recorded spacing divided by the playback
//! speed, and only while a subscription is active. Unsubscribing suspends
//! playback: on the next subscription it picks up with the point that was
//! pending, released once its original deadline has passed, and the points
//! after it keep their recorded spacing. Time spent unsubscribed is not
//! replayed. A point whose wait completes after its subscription was torn
//! down is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::config::WatchOptions;
use crate::provider::{EventSource, LocationSource, SourceEvent, SubscriptionId};
use crate::types::{GpsPoint, LocationFix};

#[derive(Debug, Default)]
struct ReplayGate {
    active: Option<SubscriptionId>,
    next_id: u64,
}

#[derive(Debug, Default)]
struct Shared {
    gate: Mutex<ReplayGate>,
    subscribed: Notify,
}

impl Shared {
    fn gate(&self) -> MutexGuard<'_, ReplayGate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Slowest accepted playback speed
pub const MIN_SPEED: f64 = 1e-3;

/// Deadline used when a gap overflows the clock, as tokio does for far sleeps
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Builder for a replayed route
#[derive(Debug, Clone)]
pub struct RouteReplay {
    route: Vec<GpsPoint>,
    speed: f64,
}

impl RouteReplay {
    pub fn new(route: Vec<GpsPoint>) -> Self {
        Self { route, speed: 1.0 }
    }

    /// Playback speed multiplier.
    ///
    /// Values that are not positive or not finite fall back to 1x; positive
    /// values below [`MIN_SPEED`] are raised to it.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = if speed.is_finite() && speed > 0.0 { speed.max(MIN_SPEED) } else { 1.0 };
        self
    }

    /// Split into the session-side source and the driver-side events
    pub fn into_parts(self) -> (ReplaySource, ReplayEvents) {
        let shared = Arc::new(Shared::default());
        debug!(points = self.route.len(), speed = self.speed, "Replay prepared");
        (
            ReplaySource { shared: Arc::clone(&shared) },
            ReplayEvents {
                shared,
                route: self.route,
                cursor: 0,
                speed: self.speed,
                last_released_at: None,
                due: None,
            },
        )
    }
}

/// [`LocationSource`] half of a replay
#[derive(Debug)]
pub struct ReplaySource {
    shared: Arc<Shared>,
}

impl LocationSource for ReplaySource {
    fn is_available(&self) -> bool {
        true
    }

    fn subscribe(&mut self, _options: &WatchOptions) -> SubscriptionId {
        let mut gate = self.shared.gate();
        gate.next_id += 1;
        let id = SubscriptionId(gate.next_id);
        gate.active = Some(id);
        drop(gate);

        self.shared.subscribed.notify_one();
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        let mut gate = self.shared.gate();
        if gate.active == Some(subscription) {
            gate.active = None;
        }
    }
}

/// [`EventSource`] half of a replay
#[derive(Debug)]
pub struct ReplayEvents {
    shared: Arc<Shared>,
    route: Vec<GpsPoint>,
    cursor: usize,
    speed: f64,
    /// Recorded timestamp of the last point that came due
    last_released_at: Option<i64>,
    /// Deadline of the current point, kept across cancelled polls
    due: Option<Instant>,
}

impl ReplayEvents {
    /// Points not yet released or skipped
    pub fn remaining(&self) -> usize {
        self.route.len() - self.cursor
    }

    fn delay_before(&self, point: &GpsPoint) -> Duration {
        let Some(last) = self.last_released_at else {
            return Duration::ZERO;
        };
        let gap_ms = point.timestamp.saturating_sub(last).max(0) as f64;
        Duration::try_from_secs_f64(gap_ms / 1000.0 / self.speed).unwrap_or(Duration::MAX)
    }
}

#[async_trait::async_trait]
impl EventSource for ReplayEvents {
    async fn next_event(&mut self) -> Option<SourceEvent> {
        loop {
            let point = *self.route.get(self.cursor)?;

            let subscribed = self.shared.gate().active.is_some();
            if !subscribed {
                self.shared.subscribed.notified().await;
                continue;
            }

            let delay = self.delay_before(&point);
            let due = *self.due.get_or_insert_with(|| {
                let now = Instant::now();
                now.checked_add(delay).unwrap_or_else(|| now + FAR_FUTURE)
            });
            tokio::time::sleep_until(due).await;
            self.due = None;
            self.cursor += 1;
            self.last_released_at = Some(point.timestamp);

            let active = self.shared.gate().active;
            match active {
                Some(subscription) => {
                    trace!(cursor = self.cursor, "Replaying point");
                    return Some(SourceEvent::Fix { subscription, fix: LocationFix::from(point) });
                }
                None => trace!(cursor = self.cursor, "Skipping point due while unsubscribed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Vec<GpsPoint> {
        (0..4).map(|i| GpsPoint::new(0.0, f64::from(i) * 0.001, i64::from(i) * 2000)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn releases_points_at_recorded_pace() {
        let (mut source, mut events) = RouteReplay::new(route()).with_speed(2.0).into_parts();
        let id = source.subscribe(&WatchOptions::default());

        let start = tokio::time::Instant::now();
        for expected_ts in [0, 2000, 4000, 6000] {
            match events.next_event().await {
                Some(SourceEvent::Fix { subscription, fix }) => {
                    assert_eq!(subscription, id);
                    assert_eq!(fix.timestamp, expected_ts);
                }
                other => panic!("unexpected event {:?}", other),
            }
        }

        // 6 s of recorded time at 2x
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert!(events.next_event().await.is_none());
        assert_eq!(events.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_subscription() {
        let (mut source, mut events) = RouteReplay::new(route()).into_parts();

        let pending = tokio::time::timeout(Duration::from_secs(30), events.next_event()).await;
        assert!(pending.is_err(), "nothing is released before subscribing");
        assert_eq!(events.remaining(), 4);

        source.subscribe(&WatchOptions::default());
        assert!(events.next_event().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_poll_keeps_its_deadline() {
        let (mut source, mut events) = RouteReplay::new(route()).into_parts();
        source.subscribe(&WatchOptions::default());
        assert!(events.next_event().await.is_some());

        let start = tokio::time::Instant::now();
        // Interrupt the 2 s wait twice, as a select loop would
        for _ in 0..2 {
            let early = tokio::time::timeout(Duration::from_millis(700), events.next_event()).await;
            assert!(early.is_err());
        }
        assert!(events.next_event().await.is_some());
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn invalid_speed_falls_back_to_realtime() {
        let replay = RouteReplay::new(vec![]).with_speed(-3.0);
        assert_eq!(replay.speed, 1.0);
        let replay = RouteReplay::new(vec![]).with_speed(f64::NAN);
        assert_eq!(replay.speed, 1.0);
        let replay = RouteReplay::new(vec![]).with_speed(1e-300);
        assert_eq!(replay.speed, MIN_SPEED);
    }

    #[tokio::test(start_paused = true)]
    async fn unrepresentable_gap_waits_instead_of_panicking() {
        let route = vec![GpsPoint::new(0.0, 0.0, i64::MIN), GpsPoint::new(0.0, 0.001, i64::MAX)];
        let (mut source, mut events) = RouteReplay::new(route).with_speed(MIN_SPEED).into_parts();
        source.subscribe(&WatchOptions::default());

        assert!(events.next_event().await.is_some());
        let pending = tokio::time::timeout(Duration::from_secs(60), events.next_event()).await;
        assert!(pending.is_err());
        assert_eq!(events.remaining(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn resubscribing_continues_with_the_pending_point() {
        let (mut source, mut events) = RouteReplay::new(route()).into_parts();
        let first = source.subscribe(&WatchOptions::default());
        assert!(events.next_event().await.is_some());

        // The wait for the 2 s point starts, then the subscription is paused
        let early = tokio::time::timeout(Duration::from_millis(500), events.next_event()).await;
        assert!(early.is_err());
        source.unsubscribe(first);
        tokio::time::advance(Duration::from_secs(10)).await;

        let second = source.subscribe(&WatchOptions::default());
        let resumed_at = tokio::time::Instant::now();
        match events.next_event().await {
            Some(SourceEvent::Fix { subscription, fix }) => {
                assert_eq!(subscription, second);
                assert_eq!(fix.timestamp, 2000);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(resumed_at.elapsed(), Duration::ZERO);

        // Later points keep their recorded spacing; paused time is not replayed
        assert!(events.next_event().await.is_some());
        assert_eq!(resumed_at.elapsed(), Duration::from_secs(2));
    }
}
