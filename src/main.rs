//! Sigscope CLI — serve the signal service, watch a live sweep, or export once.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

use sigscope::client::SignalClient;
use sigscope::config::{self, ScopeConfig};
use sigscope::export;
use sigscope::server;
use sigscope::signal::{ParamsError, SignalKind, WaveParams};
use sigscope::sweep::{
    event_channel, ScopeCommand, ScopeEvent, ScopeSession, SweepRunner, SweepWindow,
};

#[derive(Parser)]
#[command(name = "sigscope")]
#[command(about = "Sinusoid signal service and windowed sweep client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the signal service.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = server::DEFAULT_BIND)]
        bind: String,
    },
    /// Sweep against the configured endpoint, logging one line per window.
    Watch {
        #[command(flatten)]
        wave: WaveArgs,
        /// Series to display (x1, x2, y1, y2 or y3).
        #[arg(short, long, default_value_t = SignalKind::X1)]
        signal: SignalKind,
    },
    /// Fetch the initial window once and write the selection to CSV.
    Export {
        #[command(flatten)]
        wave: WaveArgs,
        /// Series to export (x1, x2, y1, y2 or y3).
        #[arg(short, long, default_value_t = SignalKind::X1)]
        signal: SignalKind,
        /// Output path; defaults to a timestamped name in the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// The seven user-editable synthesis parameters, defaults matching
/// [`WaveParams::default`].
#[derive(Args)]
struct WaveArgs {
    /// Amplitude of x1.
    #[arg(long, default_value_t = 1.0)]
    a1: f64,
    /// Amplitude of x2.
    #[arg(long, default_value_t = 0.5)]
    a2: f64,
    /// Frequency of x1 in Hz.
    #[arg(long, default_value_t = 1.0)]
    f1: f64,
    /// Frequency of x2 in Hz.
    #[arg(long, default_value_t = 2.0)]
    f2: f64,
    /// Phase of x1 in radians.
    #[arg(long, default_value_t = 0.0)]
    phi1: f64,
    /// Phase of x2 in radians.
    #[arg(long, default_value_t = 0.0)]
    phi2: f64,
    /// Points per sweep (floored at 50).
    #[arg(long, default_value_t = 200)]
    samples: usize,
}

impl WaveArgs {
    /// Validated parameters; clap already rejected non-numeric input, this
    /// catches the non-finite values `f64` parsing still lets through.
    fn into_params(self) -> Result<WaveParams, ParamsError> {
        let params = WaveParams {
            a1: self.a1,
            a2: self.a2,
            f1: self.f1,
            f2: self.f2,
            phi1: self.phi1,
            phi2: self.phi2,
            samples: self.samples,
        };
        params.validate()?;
        Ok(params)
    }
}

fn main() {
    SimpleLogger::new().with_level(LevelFilter::Info).init().unwrap();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { bind } => {
            if let Err(e) = server::run(&bind) {
                error!("service failed: {e}");
                process::exit(1);
            }
        }
        Command::Watch { wave, signal } => run_watch(wave, signal),
        Command::Export {
            wave,
            signal,
            output,
        } => run_export(wave, signal, output),
    }
}

fn run_watch(wave: WaveArgs, signal: SignalKind) {
    let config = config::load_or_default();
    let (params, client) = setup(wave, &config);

    // 1. Assemble the session and put it on its thread
    let window = SweepWindow::new(config.window_secs, config.step_secs);
    let mut session = ScopeSession::new(params, window);
    let _ = session.select(signal);

    let (events_tx, events_rx) = event_channel();
    let mut runner = SweepRunner::spawn(session, client.into_fetch_fn(), config.cadence(), events_tx);
    let commands = runner.commands();

    // 2. Ctrl-C flips the flag; the loop below notices and winds down
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst)) {
        error!("could not install interrupt handler: {e}");
        process::exit(1);
    }

    // 3. Sweep until interrupted
    commands.send(ScopeCommand::Start);
    info!(
        "watching {} against {} every {}ms (Ctrl-C to stop)",
        signal.label(),
        config.endpoint,
        config.cadence_ms
    );

    while running.load(Ordering::SeqCst) {
        match events_rx.recv_timeout(Duration::from_millis(100)) {
            Some(ScopeEvent::Swept(snapshot)) => info!(
                "{}: {} points over [{:.2}, {:.2}]",
                snapshot.selection.column(),
                snapshot.batch.len(),
                snapshot.t_start,
                snapshot.t_end
            ),
            // Failures and state changes are logged by the runner itself.
            Some(_) | None => {}
        }
    }

    runner.shutdown();
    info!("stopped");
}

fn run_export(wave: WaveArgs, signal: SignalKind, output: Option<PathBuf>) {
    let config = config::load_or_default();
    let (params, client) = setup(wave, &config);

    // One-shot: the initial window, exactly as a freshly started sweep
    // would request it.
    let window = SweepWindow::new(config.window_secs, config.step_secs);
    let request = params.sweep(window.start(), window.end());
    let batch = match client.fetch_batch(&request) {
        Ok(batch) => batch,
        Err(e) => {
            error!("fetch failed: {e}");
            process::exit(1);
        }
    };

    let path = output.unwrap_or_else(|| export::default_export_path(signal, Path::new(".")));
    match export::write_signal_csv(&batch, signal, &path) {
        Ok(()) => info!("exported {} to {}", signal.column(), path.display()),
        Err(e) => {
            error!("export failed: {e}");
            process::exit(1);
        }
    }
}

/// Shared watch/export setup: validate parameters, build the transport.
fn setup(wave: WaveArgs, config: &ScopeConfig) -> (WaveParams, SignalClient) {
    let params = match wave.into_params() {
        Ok(params) => params,
        Err(e) => {
            error!("invalid parameters: {e}");
            process::exit(1);
        }
    };
    let client = match SignalClient::new(config.endpoint.clone(), config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            error!("client setup failed: {e}");
            process::exit(1);
        }
    };
    (params, client)
}
