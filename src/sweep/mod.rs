//! Sweep engine — windowed polling, run state, and the fetch seam.
//!
//! [`session::ScopeSession`] is the pure state machine: window, selection,
//! run state, last good batch. [`runner::SweepRunner`] drives it on a
//! background thread at a fixed cadence. The session does **not** own an
//! HTTP client — ticks go through a caller-provided [`FetchFn`], which keeps
//! every sweep rule testable without a running service.

pub mod command;
pub mod runner;
pub mod session;
pub mod window;

pub use command::{
    command_channel, event_channel, CommandReceiver, CommandSender, EventReceiver, EventSender,
    ScopeCommand, ScopeEvent,
};
pub use runner::SweepRunner;
pub use session::{RunState, ScopeSession, SweepSnapshot};
pub use window::SweepWindow;

use crate::signal::{SampleBatch, SweepParams};

/// A fetch attempt failed; the triggering tick is abandoned and the next
/// scheduled tick is the only retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never completed (connection refused, timeout, ...).
    Http(String),
    /// The service answered with a non-success status.
    Status(u16),
    /// The response body violated the batch contract.
    Decode(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "request failed: {e}"),
            FetchError::Status(code) => write!(f, "service answered HTTP {code}"),
            FetchError::Decode(e) => write!(f, "invalid response body: {e}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// A callback that resolves one request into a batch.
///
/// Production wires this to the blocking HTTP client
/// ([`crate::client::SignalClient::into_fetch_fn`]); tests substitute
/// closures over [`crate::signal::synthesize`] or canned failures.
pub type FetchFn = Box<dyn FnMut(&SweepParams) -> Result<SampleBatch, FetchError> + Send>;
