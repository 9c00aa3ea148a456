//! Async handle to a running tracking session

use futures::Stream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::driver::{Command, Driver, Reply};
use crate::provider::{Clock, EventSource, LocationSource};
use crate::providers::{FixFeed, RouteReplay, TokioClock, channel};
use crate::session::TrackingSession;
use crate::types::{GpsPoint, OutdoorRunActivity, TrackingSnapshot};
use crate::{Result, TrackerError};


/// Connection to a session running on its own task
///
/// Lifecycle calls are forwarded to the task and answered with the
/// resulting snapshot. Display code reads state with [`snapshot`] on each
/// render, or follows [`snapshots`]. Dropping the connection cancels the
/// task, which releases the location subscription and timer.
///
/// [`snapshot`]: TrackingConnection::snapshot
/// [`snapshots`]: TrackingConnection::snapshots
pub struct TrackingConnection {
    /// Command sender
    commands: mpsc::Sender<Command>,

    /// Snapshot watch receiver
    snapshots: watch::Receiver<TrackingSnapshot>,

    /// Cancellation token for stopping the task
    cancel: CancellationToken,
}

impl TrackingConnection {
    /// Spawn a task for an existing session and its event source.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<L, C, E>(session: TrackingSession<L, C>, events: E) -> Self
    where
        L: LocationSource + Send + 'static,
        C: Clock + Send + 'static,
        E: EventSource,
    {
        let channels = Driver::spawn(session, events);
        Self { commands: channels.commands, snapshots: channels.snapshots, cancel: channels.cancel }
    }

    /// Session fed by host code through the returned [`FixFeed`]
    ///
    /// Fails with [`TrackerError::Config`] before anything is spawned when
    /// `config` is invalid.
    pub fn with_feed(config: TrackerConfig) -> Result<(Self, FixFeed)> {
        let (feed, source, events) = channel::channel();
        let session = TrackingSession::new(source, TokioClock::new(), config)?;
        info!("Feed-backed tracking connection created");
        Ok((Self::spawn(session, events), feed))
    }

    /// Session that replays a stored route at `speed` times its recorded pace
    pub fn replay(route: Vec<GpsPoint>, speed: f64, config: TrackerConfig) -> Result<Self> {
        let (source, events) = RouteReplay::new(route).with_speed(speed).into_parts();
        let session = TrackingSession::new(source, TokioClock::new(), config)?;
        info!(points = events.remaining(), speed, "Replay tracking connection created");
        Ok(Self::spawn(session, events))
    }

    pub async fn start(&self) -> Result<TrackingSnapshot> {
        self.request("start", Command::Start).await
    }

    pub async fn pause(&self) -> Result<TrackingSnapshot> {
        self.request("pause", Command::Pause).await
    }

    pub async fn resume(&self) -> Result<TrackingSnapshot> {
        self.request("resume", Command::Resume).await
    }

    /// Stop tracking; with `discard` the path and stats are cleared
    pub async fn stop(&self, discard: bool) -> Result<TrackingSnapshot> {
        self.request("stop", |reply| Command::Stop { discard, reply }).await
    }

    pub async fn reset(&self) -> Result<TrackingSnapshot> {
        self.request("reset", Command::Reset).await
    }

    /// Build the activity record for a stopped session
    pub async fn finalize(&self, name: impl Into<String>) -> Result<OutdoorRunActivity> {
        let name = name.into();
        self.request("finalize", |reply| Command::Finalize { name, reply }).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> TrackingSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Stream of snapshots, starting with the current one
    pub fn snapshots(&self) -> impl Stream<Item = TrackingSnapshot> + 'static {
        WatchStream::new(self.snapshots.clone())
    }

    async fn request<T>(
        &self,
        operation: &'static str,
        command: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .await
            .map_err(|_| TrackerError::channel_closed(format!("{} not delivered", operation)))?;
        rx.await.map_err(|_| TrackerError::channel_closed(format!("{} not answered", operation)))?
    }
}

impl Drop for TrackingConnection {
    fn drop(&mut self) {
        debug!("Dropping tracking connection");
        self.cancel.cancel();
    }
}
