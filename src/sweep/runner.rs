//! Background sweep thread.
//!
//! Owns a [`ScopeSession`] and its [`FetchFn`] and drives ticks at a fixed
//! cadence. Fetches run inline on this thread, one at a time: a tick only
//! fires once the previous response (or failure) has been fully applied, so
//! requests never overlap and a slow service simply thins the tick rate.

use std::path::{Path, PathBuf};
use std::sync::mpsc::RecvTimeoutError;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::export;
use crate::sweep::command::{
    command_channel, CommandReceiver, CommandSender, EventSender, ScopeCommand, ScopeEvent,
};
use crate::sweep::session::{RunState, ScopeSession};
use crate::sweep::FetchFn;

/// Handle to the sweep thread. Dropping it shuts the thread down and joins.
pub struct SweepRunner {
    commands: CommandSender,
    handle: Option<JoinHandle<()>>,
}

impl SweepRunner {
    /// Start the thread around an existing session. Events go out on
    /// `events`; steer the sweep through [`commands`](Self::commands).
    pub fn spawn(
        session: ScopeSession,
        fetch: FetchFn,
        cadence: Duration,
        events: EventSender,
    ) -> Self {
        let (tx, rx) = command_channel();
        let handle =
            thread::spawn(move || run_loop(session, fetch, cadence, rx, events));
        Self {
            commands: tx,
            handle: Some(handle),
        }
    }

    /// A sender for steering this runner; clone freely.
    pub fn commands(&self) -> CommandSender {
        self.commands.clone()
    }

    /// Ask the thread to finish and wait for it. Safe to call twice.
    pub fn shutdown(&mut self) {
        let _ = self.commands.send(ScopeCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SweepRunner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(
    mut session: ScopeSession,
    mut fetch: FetchFn,
    cadence: Duration,
    commands: CommandReceiver,
    events: EventSender,
) {
    let mut next_tick = Instant::now() + cadence;

    loop {
        let command = if session.is_running() {
            let now = Instant::now();
            if now >= next_tick {
                run_tick(&mut session, &mut fetch, &events);
                // Reschedule from *after* the fetch: overdue ticks are
                // dropped, not queued up as a burst.
                next_tick = Instant::now() + cadence;
                continue;
            }
            match commands.recv_timeout(next_tick.saturating_duration_since(now)) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            // Stopped: nothing to schedule, just wait for instructions.
            match commands.recv() {
                Some(command) => Some(command),
                None => break,
            }
        };

        if let Some(command) = command {
            match command {
                ScopeCommand::Start => {
                    if session.start() {
                        info!("sweep started");
                        events.send(ScopeEvent::State(RunState::Running));
                        next_tick = Instant::now() + cadence;
                    }
                }
                ScopeCommand::Stop => {
                    if session.stop() {
                        info!("sweep stopped at t_end = {:.3}", session.window().end());
                        events.send(ScopeEvent::State(RunState::Stopped));
                    }
                }
                ScopeCommand::Reset => {
                    if session.reset() {
                        run_tick(&mut session, &mut fetch, &events);
                        next_tick = Instant::now() + cadence;
                    }
                }
                ScopeCommand::Select(kind) => {
                    if let Some(snapshot) = session.select(kind) {
                        events.send(ScopeEvent::Swept(snapshot));
                    }
                }
                ScopeCommand::SetParams(params) => session.set_params(params),
                ScopeCommand::Export(path) => run_export(&session, path, &events),
                ScopeCommand::Shutdown => {
                    session.stop();
                    events.send(ScopeEvent::State(RunState::Stopped));
                    break;
                }
            }
        }
    }
}

fn run_tick(session: &mut ScopeSession, fetch: &mut FetchFn, events: &EventSender) {
    match session.tick(fetch) {
        Ok(snapshot) => {
            events.send(ScopeEvent::Swept(snapshot));
        }
        Err(e) => {
            warn!("sweep failed: {e}");
            events.send(ScopeEvent::SweepFailed(e.to_string()));
        }
    }
}

fn run_export(session: &ScopeSession, path: Option<PathBuf>, events: &EventSender) {
    let Some((kind, batch)) = session.exportable() else {
        events.send(ScopeEvent::ExportFailed(
            export::ExportError::NoData.to_string(),
        ));
        return;
    };
    let path = match path {
        Some(path) => path,
        None => export::default_export_path(kind, Path::new(".")),
    };
    match export::write_signal_csv(batch, kind, &path) {
        Ok(()) => {
            info!("exported {} to {}", kind.column(), path.display());
            events.send(ScopeEvent::Exported(path));
        }
        Err(e) => {
            warn!("export failed: {e}");
            events.send(ScopeEvent::ExportFailed(e.to_string()));
        }
    }
}
