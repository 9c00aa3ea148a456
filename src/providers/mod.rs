//! Runtime implementations of the platform capabilities
//!
//! - [`channel`]: fixes pushed by host code (a GPS daemon, a webview bridge)
//! - [`replay`]: a stored route played back at its recorded pace
//! - [`clock`]: tokio-backed wall clock

pub mod channel;
pub mod clock;
pub mod replay;

pub use channel::{ChannelEvents, ChannelSource, FixFeed};
pub use clock::TokioClock;
pub use replay::{ReplayEvents, ReplaySource, RouteReplay};
