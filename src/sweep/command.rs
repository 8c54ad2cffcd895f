//! Commands into the sweep thread and events back out.
//!
//! Both directions are plain mpsc channels behind thin wrappers, so the
//! runner can live on its own thread while the CLI (or a test) talks to it
//! without sharing any state.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::signal::{SignalKind, WaveParams};
use crate::sweep::session::{RunState, SweepSnapshot};

/// Everything the outside world can ask of a running sweep.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeCommand {
    /// Begin ticking at the configured cadence.
    Start,
    /// Halt ticking; window and data stay put.
    Stop,
    /// Rewind the window to its initial span. A running sweep fetches
    /// immediately instead of waiting out the current interval.
    Reset,
    /// Switch the displayed series without fetching.
    Select(SignalKind),
    /// Replace the wave parameters; picked up by the next tick.
    SetParams(WaveParams),
    /// Write the selected series to CSV. `None` derives a timestamped
    /// filename in the current directory.
    Export(Option<PathBuf>),
    /// Stop ticking and end the runner thread.
    Shutdown,
}

/// What the sweep thread reports back.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeEvent {
    /// The run state changed (start, stop, shutdown).
    State(RunState),
    /// A view is ready to render: a sweep completed, or the selection
    /// changed over the existing batch.
    Swept(SweepSnapshot),
    /// A sweep failed; the previous display is still valid.
    SweepFailed(String),
    /// An export landed at this path.
    Exported(PathBuf),
    /// An export was refused or the write failed.
    ExportFailed(String),
}

/// Sending half of the command channel. Cheap to clone; hand one to every
/// input surface that needs to steer the sweep.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<ScopeCommand>,
}

impl CommandSender {
    /// Returns `false` if the runner is gone.
    pub fn send(&self, command: ScopeCommand) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// Receiving half of the command channel; owned by the runner thread.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: Receiver<ScopeCommand>,
}

impl CommandReceiver {
    /// Non-blocking: the next pending command, if any.
    pub fn poll(&self) -> Option<ScopeCommand> {
        self.rx.try_recv().ok()
    }

    /// Block until a command arrives. `None` means every sender dropped.
    pub(crate) fn recv(&self) -> Option<ScopeCommand> {
        self.rx.recv().ok()
    }

    /// Block up to `timeout` for a command; lets the runner sleep out the
    /// cadence interval while staying responsive.
    pub(crate) fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<ScopeCommand, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Fresh command channel.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::channel();
    (CommandSender { tx }, CommandReceiver { rx })
}

/// Sending half of the event channel; owned by the runner thread.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<ScopeEvent>,
}

impl EventSender {
    /// Returns `false` if no one is listening anymore.
    pub fn send(&self, event: ScopeEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Receiving half of the event channel, for whoever renders or logs.
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<ScopeEvent>,
}

impl EventReceiver {
    /// Non-blocking: the next pending event, if any.
    pub fn poll(&self) -> Option<ScopeEvent> {
        self.rx.try_recv().ok()
    }

    /// Every event queued so far, in arrival order.
    pub fn drain(&self) -> Vec<ScopeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Block up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ScopeEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Fresh event channel.
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_arrive_in_order() {
        let (tx, rx) = command_channel();
        assert!(tx.send(ScopeCommand::Start));
        assert!(tx.send(ScopeCommand::Select(SignalKind::Sum)));
        assert!(tx.send(ScopeCommand::Stop));

        assert_eq!(rx.poll(), Some(ScopeCommand::Start));
        assert_eq!(rx.poll(), Some(ScopeCommand::Select(SignalKind::Sum)));
        assert_eq!(rx.poll(), Some(ScopeCommand::Stop));
        assert_eq!(rx.poll(), None);
    }

    #[test]
    fn send_reports_closed_channel() {
        let (tx, rx) = command_channel();
        drop(rx);
        assert!(!tx.send(ScopeCommand::Start));
    }

    #[test]
    fn event_poll_takes_one_at_a_time() {
        let (tx, rx) = event_channel();
        tx.send(ScopeEvent::State(RunState::Stopped));
        tx.send(ScopeEvent::ExportFailed("disk full".into()));

        assert_eq!(rx.poll(), Some(ScopeEvent::State(RunState::Stopped)));
        assert_eq!(rx.poll(), Some(ScopeEvent::ExportFailed("disk full".into())));
        assert_eq!(rx.poll(), None);
    }

    #[test]
    fn event_drain_empties_the_queue() {
        let (tx, rx) = event_channel();
        tx.send(ScopeEvent::State(RunState::Running));
        tx.send(ScopeEvent::SweepFailed("timeout".into()));

        let events = rx.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ScopeEvent::State(RunState::Running));
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn recv_timeout_expires_quietly() {
        let (_tx, rx) = event_channel();
        assert_eq!(rx.recv_timeout(Duration::from_millis(5)), None);
    }
}
