//! Driver spawns and runs the task that owns a tracking session

use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::provider::{Clock, EventSource, LocationSource, SourceEvent, TimerId};
use crate::session::TrackingSession;
use crate::types::{OutdoorRunActivity, TrackingSnapshot};
use crate::Result;

/// Reply channel for lifecycle commands
pub type Reply<T> = oneshot::Sender<Result<T>>;

/// Lifecycle requests sent to the session task
#[derive(Debug)]
pub enum Command {
    Start(Reply<TrackingSnapshot>),
    Pause(Reply<TrackingSnapshot>),
    Resume(Reply<TrackingSnapshot>),
    Stop { discard: bool, reply: Reply<TrackingSnapshot> },
    Reset(Reply<TrackingSnapshot>),
    Finalize { name: String, reply: Reply<OutdoorRunActivity> },
}

/// Result of spawning the session task
pub struct DriverChannels {
    /// Sender for lifecycle commands
    pub commands: mpsc::Sender<Command>,
    /// Receiver for the latest session snapshot
    pub snapshots: watch::Receiver<TrackingSnapshot>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Owns one session and serializes every event that touches it
///
/// Commands, location events and timer ticks are handled one at a time on a
/// single task, so the session itself needs no locking. A new snapshot is
/// published after each of them.
pub struct Driver;

impl Driver {
    /// Spawn the session task. Must be called within a tokio runtime.
    pub fn spawn<L, C, E>(session: TrackingSession<L, C>, events: E) -> DriverChannels
    where
        L: LocationSource + Send + 'static,
        C: Clock + Send + 'static,
        E: EventSource,
    {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        tokio::spawn(async move {
            Self::session_task(session, events, command_rx, snapshot_tx, cancel_task).await;
        });

        DriverChannels { commands: command_tx, snapshots: snapshot_rx, cancel }
    }

    async fn session_task<L, C, E>(
        mut session: TrackingSession<L, C>,
        mut events: E,
        mut commands: mpsc::Receiver<Command>,
        snapshot_tx: watch::Sender<TrackingSnapshot>,
        cancel: CancellationToken,
    ) where
        L: LocationSource,
        C: Clock,
        E: EventSource,
    {
        info!("Session task started");
        let period = session.config().tick_interval();
        let mut ticker: Option<(TimerId, Interval)> = None;
        let mut events_open = true;
        let mut event_count = 0u64;

        loop {
            // Location events go first so fixes delivered before a command
            // are recorded before it takes effect
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Session task cancelled");
                    break;
                }
                event = events.next_event(), if events_open => match event {
                    Some(SourceEvent::Fix { subscription, fix }) => {
                        event_count += 1;
                        session.on_fix(subscription, fix);
                    }
                    Some(SourceEvent::Error { subscription, error }) => {
                        event_count += 1;
                        session.on_location_error(subscription, error);
                    }
                    None => {
                        info!("Location source ended after {} events", event_count);
                        events_open = false;
                    }
                },
                Some(timer) = Self::next_tick(&mut ticker) => {
                    session.on_tick(timer);
                }
                command = commands.recv() => match command {
                    Some(command) => Self::apply(&mut session, command),
                    None => {
                        debug!("All connection handles dropped, shutting down");
                        break;
                    }
                },
            }

            Self::sync_ticker(&session, &mut ticker, period);
            snapshot_tx.send_replace(session.snapshot());
        }

        info!("Session task ended (processed {} location events)", event_count);
    }

    fn apply<L: LocationSource, C: Clock>(session: &mut TrackingSession<L, C>, command: Command) {
        trace!(?command, "Applying command");
        // A dropped reply means the caller stopped waiting; the transition still stands
        match command {
            Command::Start(reply) => {
                let _ = reply.send(session.start());
            }
            Command::Pause(reply) => {
                let _ = reply.send(session.pause());
            }
            Command::Resume(reply) => {
                let _ = reply.send(session.resume());
            }
            Command::Stop { discard, reply } => {
                let _ = reply.send(session.stop(discard));
            }
            Command::Reset(reply) => {
                let _ = reply.send(session.reset());
            }
            Command::Finalize { name, reply } => {
                let _ = reply.send(session.finalize(&name));
            }
        }
    }

    /// Resolve on the next tick of the running timer; pending forever without one
    async fn next_tick(ticker: &mut Option<(TimerId, Interval)>) -> Option<TimerId> {
        match ticker {
            Some((timer, interval)) => {
                interval.tick().await;
                Some(*timer)
            }
            None => std::future::pending().await,
        }
    }

    /// Keep the tokio interval in step with the session's timer handle
    fn sync_ticker<L: LocationSource, C: Clock>(
        session: &TrackingSession<L, C>,
        ticker: &mut Option<(TimerId, Interval)>,
        period: Duration,
    ) {
        let wanted = session.active_timer();
        if ticker.as_ref().map(|(id, _)| *id) == wanted {
            return;
        }

        *ticker = wanted.map(|timer| {
            debug!(%timer, ?period, "Starting duration interval");
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            (timer, interval)
        });
    }
}
