//! Tokio-backed clock

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::Instant;
use tracing::trace;

use crate::provider::{Clock, TimerId};

/// Wall clock anchored at construction and advanced by tokio's monotonic
/// clock, so paused test runtimes move it deterministically.
///
/// Timer ids are only minted here; the driver owns the matching
/// `tokio::time::Interval` for the active id.
#[derive(Debug)]
pub struct TokioClock {
    epoch_ms: i64,
    anchor: Instant,
    next_id: u64,
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioClock {
    pub fn new() -> Self {
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();
        Self { epoch_ms, anchor: Instant::now(), next_id: 0 }
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> i64 {
        self.epoch_ms + self.anchor.elapsed().as_millis() as i64
    }

    fn start_interval(&mut self, period: Duration) -> TimerId {
        self.next_id += 1;
        trace!(id = self.next_id, ?period, "Interval requested");
        TimerId(self.next_id)
    }

    fn cancel_interval(&mut self, timer: TimerId) {
        trace!(%timer, "Interval cancelled");
    }
}
