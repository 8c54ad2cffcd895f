//! Sweep pipeline tests — session → fetch seam → runner → events, no network.
//!
//! Every fetch is a closure over the local synthesizer (or a canned
//! failure), so these scenarios exercise the full polling discipline —
//! window advancement, failure handling, selection, export gating —
//! deterministically and without a service process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use assert_approx_eq::assert_approx_eq;

use sigscope::export;
use sigscope::signal::{synthesize, SignalKind, SweepParams, WaveParams};
use sigscope::sweep::{
    event_channel, EventReceiver, FetchError, FetchFn, ScopeCommand, ScopeEvent, ScopeSession,
    SweepRunner, SweepSnapshot, SweepWindow,
};

const DURATION: f64 = 2.0;
const STEP: f64 = 0.01;

/// Helper: a fresh session over the production default window.
fn session() -> ScopeSession {
    ScopeSession::new(WaveParams::default(), SweepWindow::new(DURATION, STEP))
}

/// Helper: resolve fetches locally, recording each request.
fn recording_fetch(log: Arc<Mutex<Vec<SweepParams>>>) -> FetchFn {
    Box::new(move |request| {
        log.lock().unwrap().push(*request);
        Ok(synthesize(request))
    })
}

/// Helper: wait for the next completed sweep on the event channel.
fn next_swept(events: &EventReceiver) -> SweepSnapshot {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if let Some(ScopeEvent::Swept(snapshot)) = events.recv_timeout(Duration::from_millis(50))
        {
            return snapshot;
        }
    }
    panic!("no sweep within two seconds");
}

// =============================================================================
// Test 1: A long run slides the window exactly one step per sweep
// =============================================================================

#[test]
fn hundred_sweeps_slide_the_window_a_second() {
    let mut s = session();
    let mut fetch: FetchFn = Box::new(|request| Ok(synthesize(request)));

    let first = s.tick(&mut fetch).expect("first sweep");
    assert_approx_eq!(first.t_start, 0.0);
    assert_approx_eq!(first.t_end, 2.0);

    let mut last = first;
    for _ in 0..99 {
        last = s.tick(&mut fetch).expect("sweep");
    }
    assert_approx_eq!(last.t_end, 2.0 + 99.0 * STEP, 1e-9);
    assert_approx_eq!(last.t_end - last.t_start, DURATION, 1e-9);
}

// =============================================================================
// Test 2: A failure holds the window; recovery re-requests the same span
// =============================================================================

#[test]
fn failure_then_recovery_repeats_the_span() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut good = recording_fetch(Arc::clone(&log));
    let mut bad: FetchFn = Box::new(|_| Err(FetchError::Status(500)));

    let mut s = session();
    s.tick(&mut good).expect("first sweep");
    s.tick(&mut bad).expect_err("canned failure");
    s.tick(&mut good).expect("recovery sweep");

    let requests = log.lock().unwrap();
    assert_eq!(requests.len(), 2, "failures must not consume a request slot");
    // The recovery request covers the exact span the failure abandoned.
    assert_approx_eq!(requests[1].t_start, 0.01);
    assert_approx_eq!(requests[1].t_end, 2.01);
}

// =============================================================================
// Test 3: Parameter edits apply to the next request, nothing sooner
// =============================================================================

#[test]
fn params_change_shows_up_in_the_next_request() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut fetch = recording_fetch(Arc::clone(&log));

    let mut s = session();
    s.tick(&mut fetch).expect("sweep with defaults");

    let mut edited = WaveParams::default();
    edited.a1 = 2.5;
    edited.f2 = 7.0;
    s.set_params(edited);
    assert_eq!(log.lock().unwrap().len(), 1, "editing must not fetch");

    s.tick(&mut fetch).expect("sweep with edits");
    let requests = log.lock().unwrap();
    assert_eq!(requests[0].a1, 1.0);
    assert_eq!(requests[1].a1, 2.5);
    assert_eq!(requests[1].f2, 7.0);
}

// =============================================================================
// Test 4: Selection is display-only — no request, fresh columns
// =============================================================================

#[test]
fn selection_switch_rereads_the_same_batch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let mut fetch: FetchFn = Box::new(move |request| {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(synthesize(request))
    });

    let mut s = session();
    let swept = s.tick(&mut fetch).expect("sweep");

    for kind in SignalKind::ALL {
        let view = s.select(kind).expect("view over existing batch");
        assert_eq!(view.selection, kind);
        assert_eq!(view.batch, swept.batch, "selection must not refetch");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Test 5: Runner scenario — start, sweep, select, export, stop
// =============================================================================

#[test]
fn runner_scenario_sweeps_selects_and_exports() {
    let fetch: FetchFn = Box::new(|request| Ok(synthesize(request)));
    let (events_tx, events) = event_channel();
    let mut runner = SweepRunner::spawn(
        session(),
        fetch,
        Duration::from_millis(10),
        events_tx,
    );
    let commands = runner.commands();

    commands.send(ScopeCommand::Start);
    let first = next_swept(&events);
    assert_approx_eq!(first.t_end, 2.0);

    // Switch the live view; the next view event carries the new series.
    commands.send(ScopeCommand::Select(SignalKind::Diff));
    let deadline = Instant::now() + Duration::from_secs(2);
    let mut diff_seen = false;
    while Instant::now() < deadline {
        if let Some(ScopeEvent::Swept(s)) = events.recv_timeout(Duration::from_millis(50)) {
            if s.selection == SignalKind::Diff {
                diff_seen = true;
                break;
            }
        }
    }
    assert!(diff_seen, "selection change must reach the event stream");

    // Export lands with the selection's column set.
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("diff.csv");
    commands.send(ScopeCommand::Export(Some(path.clone())));

    let deadline = Instant::now() + Duration::from_secs(2);
    let mut exported = false;
    while Instant::now() < deadline {
        match events.recv_timeout(Duration::from_millis(50)) {
            Some(ScopeEvent::Exported(p)) => {
                assert_eq!(p, path);
                exported = true;
                break;
            }
            Some(ScopeEvent::ExportFailed(e)) => panic!("export failed: {e}"),
            _ => {}
        }
    }
    assert!(exported, "export must complete");

    let written = std::fs::read_to_string(&path).expect("exported file");
    assert!(written.starts_with("t,x1,x2,y2\n"));

    commands.send(ScopeCommand::Stop);
    runner.shutdown();
}

// =============================================================================
// Test 6: Reset restores the initial window in both run states
// =============================================================================

#[test]
fn reset_restores_the_initial_window() {
    let fetch: FetchFn = Box::new(|request| {
        // Slow enough that several cadence intervals pass per sweep.
        thread::sleep(Duration::from_millis(5));
        Ok(synthesize(request))
    });
    let (events_tx, events) = event_channel();
    let mut runner = SweepRunner::spawn(
        session(),
        fetch,
        Duration::from_millis(10),
        events_tx,
    );
    let commands = runner.commands();

    // Run a while, then stop somewhere past the initial window.
    commands.send(ScopeCommand::Start);
    let mut advanced = next_swept(&events);
    while advanced.t_end < 2.03 {
        advanced = next_swept(&events);
    }
    commands.send(ScopeCommand::Stop);
    thread::sleep(Duration::from_millis(50));
    events.drain();

    // Stopped reset: silent, takes effect when the sweep resumes.
    commands.send(ScopeCommand::Reset);
    commands.send(ScopeCommand::Start);
    let resumed = next_swept(&events);
    assert_approx_eq!(resumed.t_start, 0.0);
    assert_approx_eq!(resumed.t_end, 2.0);

    // Running reset: the rewound window arrives without waiting a full
    // cadence, and later sweeps slide on from it.
    while next_swept(&events).t_end < 2.03 {}
    commands.send(ScopeCommand::Reset);
    let deadline = Instant::now() + Duration::from_secs(2);
    let mut rewound = false;
    while Instant::now() < deadline {
        if let Some(ScopeEvent::Swept(s)) = events.recv_timeout(Duration::from_millis(50)) {
            if (s.t_end - 2.0).abs() < 1e-9 {
                rewound = true;
                break;
            }
        }
    }
    assert!(rewound, "running reset must fetch the initial window again");

    runner.shutdown();
}

// =============================================================================
// Test 7: Export gating — failures disarm until the next success
// =============================================================================

#[test]
fn export_refused_between_failure_and_recovery() {
    let mut s = session();
    let mut good: FetchFn = Box::new(|request| Ok(synthesize(request)));
    let mut bad: FetchFn = Box::new(|_| Err(FetchError::Http("boom".into())));

    assert!(s.exportable().is_none(), "nothing to export before data");

    s.tick(&mut good).expect("sweep");
    let (kind, batch) = s.exportable().expect("armed after success");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ok.csv");
    export::write_signal_csv(batch, kind, &path).expect("export");
    assert!(path.exists());

    s.tick(&mut bad).expect_err("canned failure");
    assert!(
        s.exportable().is_none(),
        "failed sweep must disarm export even though old data remains"
    );

    s.tick(&mut good).expect("recovery");
    assert!(s.exportable().is_some());
}
