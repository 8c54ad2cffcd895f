//! Scope session — run state, windowed ticks, and export gating.

use crate::signal::{SampleBatch, SignalKind, WaveParams};
use crate::sweep::window::SweepWindow;
use crate::sweep::{FetchError, FetchFn};

/// Whether the sweep loop is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No ticks are scheduled. The last fetched batch stays on display.
    #[default]
    Stopped,
    /// A tick fires every cadence interval.
    Running,
}

/// One completed sweep, ready to render: the selected series name plus the
/// batch and the window it was fetched over.
///
/// The bounds are captured *before* the window advances, so they always
/// describe the data actually inside `batch`.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSnapshot {
    pub selection: SignalKind,
    pub t_start: f64,
    pub t_end: f64,
    pub batch: SampleBatch,
}

impl SweepSnapshot {
    /// The series values the current selection maps to.
    pub fn series(&self) -> &[f64] {
        self.batch.series(self.selection)
    }
}

/// The poller's state machine. Owns the wave parameters, the sliding
/// window, the selected series, and the last good batch.
///
/// Deliberately free of clocks and sockets: [`ScopeSession::tick`] is called
/// by the runner (or a test) with whatever [`FetchFn`] should resolve the
/// request, and every transition below is synchronous.
#[derive(Debug)]
pub struct ScopeSession {
    params: WaveParams,
    window: SweepWindow,
    selection: SignalKind,
    state: RunState,
    last_batch: Option<SampleBatch>,
    last_bounds: Option<(f64, f64)>,
    export_armed: bool,
}

impl ScopeSession {
    /// Session over a fresh window. Parameters must already be validated;
    /// the boundaries that accept raw input ([`WaveParams::validate`]) sit
    /// in the CLI and the config loader.
    pub fn new(params: WaveParams, window: SweepWindow) -> Self {
        Self {
            params,
            window,
            selection: SignalKind::default(),
            state: RunState::Stopped,
            last_batch: None,
            last_bounds: None,
            export_armed: false,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Begin ticking. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.state == RunState::Running {
            return false;
        }
        self.state = RunState::Running;
        true
    }

    /// Halt ticking. The window and the last batch are kept, so a later
    /// [`start`](Self::start) resumes exactly where the sweep left off.
    /// Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        if self.state == RunState::Stopped {
            return false;
        }
        self.state = RunState::Stopped;
        true
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    /// Replace the wave parameters. Takes effect on the next tick; no
    /// fetch is triggered here.
    pub fn set_params(&mut self, params: WaveParams) {
        self.params = params;
    }

    pub fn selection(&self) -> SignalKind {
        self.selection
    }

    /// Switch the displayed series. Pure re-slice: the last batch already
    /// carries every column, so no fetch happens and the returned snapshot
    /// (if any data exists yet) reflects the new selection immediately.
    pub fn select(&mut self, kind: SignalKind) -> Option<SweepSnapshot> {
        self.selection = kind;
        self.snapshot()
    }

    pub fn window(&self) -> &SweepWindow {
        &self.window
    }

    /// Rewind the window to its initial span. The last batch stays on
    /// display until fresh data replaces it. Returns `true` when the caller
    /// should fetch immediately (i.e. the session is running).
    pub fn reset(&mut self) -> bool {
        self.window.reset();
        self.is_running()
    }

    /// Run one sweep: build the request from the *current* parameters and
    /// window, resolve it through `fetch`, and on success store the batch,
    /// arm export, and advance the window.
    ///
    /// On failure nothing moves: the window stays put (the next tick
    /// re-requests the same span), the previous batch stays on display, and
    /// export is disarmed until a sweep succeeds again.
    pub fn tick(&mut self, fetch: &mut FetchFn) -> Result<SweepSnapshot, FetchError> {
        let t_start = self.window.start();
        let t_end = self.window.end();
        let request = self.params.sweep(t_start, t_end);

        let batch = match fetch(&request) {
            Ok(batch) => batch,
            Err(e) => {
                self.export_armed = false;
                return Err(e);
            }
        };

        self.last_batch = Some(batch.clone());
        self.last_bounds = Some((t_start, t_end));
        self.export_armed = true;
        self.window.advance();

        Ok(SweepSnapshot {
            selection: self.selection,
            t_start,
            t_end,
            batch,
        })
    }

    /// The current selection over the last good batch, or `None` before the
    /// first successful sweep.
    pub fn snapshot(&self) -> Option<SweepSnapshot> {
        let batch = self.last_batch.as_ref()?;
        let (t_start, t_end) = self.last_bounds?;
        Some(SweepSnapshot {
            selection: self.selection,
            t_start,
            t_end,
            batch: batch.clone(),
        })
    }

    /// What an export would write right now: the selected series and the
    /// batch backing it. `None` while no data has arrived yet *or* after a
    /// failed sweep — stale data must not masquerade as current.
    pub fn exportable(&self) -> Option<(SignalKind, &SampleBatch)> {
        if !self.export_armed {
            return None;
        }
        self.last_batch.as_ref().map(|b| (self.selection, b))
    }
}
