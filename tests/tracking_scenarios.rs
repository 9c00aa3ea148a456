//! End-to-end tracking scenarios through the public API
//!
//! The synchronous scenarios drive a [`TrackingSession`] with hand-rolled
//! capabilities; the async ones go through [`TrackingConnection`] on a paused
//! tokio clock.

use std::time::Duration;

use chrono::NaiveDate;
use stridelog::{
    ActivityLog, ActivitySummary, Clock, DailyLog, LocationFix, LocationSource, SubscriptionId,
    TimerId, TrackerConfig, TrackerError, TrackingConnection, TrackingSession, TrackingState,
    WatchOptions,
};

#[derive(Default)]
struct StaticSource {
    next: u64,
}

impl LocationSource for StaticSource {
    fn is_available(&self) -> bool {
        true
    }

    fn subscribe(&mut self, _options: &WatchOptions) -> SubscriptionId {
        self.next += 1;
        SubscriptionId(self.next)
    }

    fn unsubscribe(&mut self, _subscription: SubscriptionId) {}
}

/// Clock moved by hand through a shared cell
#[derive(Clone, Default)]
struct SteppedClock {
    now_ms: std::rc::Rc<std::cell::Cell<i64>>,
    next: u64,
}

impl SteppedClock {
    fn advance_secs(&self, secs: i64) {
        self.now_ms.set(self.now_ms.get() + secs * 1000);
    }
}

impl Clock for SteppedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }

    fn start_interval(&mut self, _period: Duration) -> TimerId {
        self.next += 1;
        TimerId(self.next)
    }

    fn cancel_interval(&mut self, _timer: TimerId) {}
}

fn tick(session: &mut TrackingSession<StaticSource, SteppedClock>) {
    let timer = session.active_timer().expect("timer running");
    session.on_tick(timer);
}

#[test]
fn duration_excludes_paused_time() {
    let clock = SteppedClock::default();
    let mut session =
        TrackingSession::new(StaticSource::default(), clock.clone(), TrackerConfig::default())
            .unwrap();

    session.start().unwrap();
    clock.advance_secs(5);
    tick(&mut session);
    session.pause().unwrap();

    clock.advance_secs(10);
    session.resume().unwrap();
    clock.advance_secs(3);
    tick(&mut session);

    let snapshot = session.stop(false).unwrap();
    assert!((snapshot.stats.duration_seconds - 8.0).abs() < 1e-9);
}

#[test]
fn resume_never_bridges_the_gap() {
    let clock = SteppedClock::default();
    let mut session =
        TrackingSession::new(StaticSource::default(), clock.clone(), TrackerConfig::default())
            .unwrap();

    session.start().unwrap();
    let sub = session.active_subscription().unwrap();
    session.on_fix(sub, LocationFix::new(0.0, 0.0, 0));
    session.pause().unwrap();
    session.resume().unwrap();

    let sub = session.active_subscription().unwrap();
    let snapshot = session.on_fix(sub, LocationFix::new(0.0, 0.5, 60_000));
    assert_eq!(snapshot.stats.distance_km, 0.0);
    assert_eq!(snapshot.path.segments().len(), 2);
    assert_eq!(snapshot.flattened().len(), 2);
}

#[test]
fn minimum_distance_boundary() {
    let finalizer = stridelog::Finalizer::default();
    let at = chrono::Utc::now();
    let stats = |distance_km| stridelog::TrackerStats {
        duration_seconds: 10.0,
        distance_km,
        pace_min_per_km: 0.0,
    };

    let err = finalizer.finalize(&stats(0.005), vec![], "short", at).unwrap_err();
    assert!(matches!(err, TrackerError::ActivityTooShort { .. }));
    assert!(finalizer.finalize(&stats(0.01), vec![], "enough", at).is_ok());
}

#[tokio::test(start_paused = true)]
async fn tracked_run_is_saved_and_summarized() {
    let _ = tracing_subscriber::fmt::try_init();

    let (connection, feed) = TrackingConnection::with_feed(TrackerConfig::default()).unwrap();
    connection.start().await.unwrap();

    let t0 = 1_700_000_000_000;
    assert!(feed.push_fix(LocationFix::new(0.0, 0.0, t0)));
    assert!(feed.push_fix(LocationFix::new(0.0, 0.001, t0 + 5000)));
    tokio::time::sleep(Duration::from_millis(5500)).await;

    assert_eq!(connection.stop(false).await.unwrap().state, TrackingState::Stopped);
    let activity = connection.finalize("Test Run").await.unwrap();
    assert_eq!(activity.distance_km, 0.11);
    assert_eq!(activity.duration_seconds, 5);
    assert_eq!(activity.route.len(), 2);

    let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    let mut log = DailyLog::new();
    let id = activity.id;
    log.append(date, activity).unwrap();

    let stored = log.find(id).expect("stored");
    let summary = ActivitySummary::from(stored);
    assert_eq!(summary.duration_display, "00:05");
    assert_eq!(summary.point_count, 2);
    assert!(summary.bounds.is_some());
}

#[tokio::test(start_paused = true)]
async fn idle_pause_resume_stop_cannot_be_saved() {
    let (connection, _feed) = TrackingConnection::with_feed(TrackerConfig::default()).unwrap();

    connection.start().await.unwrap();
    connection.pause().await.unwrap();
    connection.resume().await.unwrap();
    connection.stop(false).await.unwrap();

    let err = connection.finalize("Nothing").await.unwrap_err();
    assert!(matches!(err, TrackerError::ActivityTooShort { .. }));
    assert!(!err.recovery_suggestions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn discarded_stop_clears_the_session() {
    let (connection, feed) = TrackingConnection::with_feed(TrackerConfig::default()).unwrap();
    connection.start().await.unwrap();
    feed.push_fix(LocationFix::new(10.0, 10.0, 0));
    feed.push_fix(LocationFix::new(10.0, 10.01, 4000));
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let snapshot = connection.stop(true).await.unwrap();
    assert_eq!(snapshot.state, TrackingState::Stopped);
    assert!(snapshot.path.is_empty());
    assert_eq!(snapshot.stats, stridelog::TrackerStats::default());
}
