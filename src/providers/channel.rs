//! Location source fed through a channel
//!
//! Host code holds a [`FixFeed`] and pushes fixes as the platform reports
//! them. A fix pushed while no subscription is active is dropped at the
//! feed, so nothing recorded during a pause reaches the session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::config::WatchOptions;
use crate::provider::{EventSource, LocationError, LocationSource, SourceEvent, SubscriptionId};
use crate::types::LocationFix;

#[derive(Debug)]
struct Gate {
    available: bool,
    active: Option<SubscriptionId>,
    next_id: u64,
    options: Option<WatchOptions>,
}

fn lock(gate: &Mutex<Gate>) -> MutexGuard<'_, Gate> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Create a connected feed, source and event stream
pub fn channel() -> (FixFeed, ChannelSource, ChannelEvents) {
    let gate = Arc::new(Mutex::new(Gate {
        available: true,
        active: None,
        next_id: 0,
        options: None,
    }));
    let (tx, rx) = mpsc::unbounded_channel();

    (
        FixFeed { gate: Arc::clone(&gate), tx },
        ChannelSource { gate },
        ChannelEvents { rx },
    )
}

/// Host-side handle for pushing platform events
#[derive(Debug, Clone)]
pub struct FixFeed {
    gate: Arc<Mutex<Gate>>,
    tx: mpsc::UnboundedSender<SourceEvent>,
}

impl FixFeed {
    /// Push a fix. Returns false if it was dropped because nothing is subscribed.
    pub fn push_fix(&self, fix: LocationFix) -> bool {
        let gate = lock(&self.gate);
        let Some(subscription) = gate.active else {
            trace!("No active subscription, dropping fix");
            return false;
        };
        self.tx.send(SourceEvent::Fix { subscription, fix }).is_ok()
    }

    /// Push a platform error for the active subscription
    pub fn push_error(&self, error: LocationError) -> bool {
        let gate = lock(&self.gate);
        let Some(subscription) = gate.active else {
            trace!("No active subscription, dropping error");
            return false;
        };
        self.tx.send(SourceEvent::Error { subscription, error }).is_ok()
    }

    /// Declare whether the platform has location capability
    pub fn set_available(&self, available: bool) {
        lock(&self.gate).available = available;
    }

    pub fn is_subscribed(&self) -> bool {
        lock(&self.gate).active.is_some()
    }

    /// Options of the most recent subscription
    pub fn watch_options(&self) -> Option<WatchOptions> {
        lock(&self.gate).options
    }
}

/// [`LocationSource`] half, owned by the session
#[derive(Debug)]
pub struct ChannelSource {
    gate: Arc<Mutex<Gate>>,
}

impl LocationSource for ChannelSource {
    fn is_available(&self) -> bool {
        lock(&self.gate).available
    }

    fn subscribe(&mut self, options: &WatchOptions) -> SubscriptionId {
        let mut gate = lock(&self.gate);
        gate.next_id += 1;
        let id = SubscriptionId(gate.next_id);
        gate.active = Some(id);
        gate.options = Some(*options);
        debug!(%id, "Feed subscribed");
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        let mut gate = lock(&self.gate);
        if gate.active == Some(subscription) {
            gate.active = None;
            debug!(%subscription, "Feed unsubscribed");
        }
    }
}

/// [`EventSource`] half, owned by the driver
#[derive(Debug)]
pub struct ChannelEvents {
    rx: mpsc::UnboundedReceiver<SourceEvent>,
}

#[async_trait::async_trait]
impl EventSource for ChannelEvents {
    async fn next_event(&mut self) -> Option<SourceEvent> {
        self.rx.recv().await
    }
}
