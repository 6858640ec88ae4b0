//! tempreport: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SysfsAdcSensor     SystemClock     FileLog / NullLog         │
//! │  SimulatedSensor    (Clock)         (TranscriptLog)           │
//! │  (SensorPort)                                                 │
//! │  StdioTransport · TcpTransport · TlsTransport (Transport)      │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            Reporter (single-threaded loop)             │  │
//! │  │  SessionState · LineFramer · Transcript                │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  SIGINT / SIGTERM ──▶ ShutdownTrigger                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use tempreport::adapters::clock::SystemClock;
use tempreport::adapters::log_file::FileLog;
use tempreport::adapters::sensor::{SimulatedSensor, SysfsAdcSensor};
use tempreport::adapters::stdio::StdioTransport;
use tempreport::adapters::tcp::TcpTransport;
use tempreport::app::ports::{NullLog, SensorPort, TranscriptLog};
use tempreport::app::service::{Reporter, SessionSummary};
use tempreport::cli::{Cli, SensorSource};
use tempreport::config::{SessionConfig, TransportTarget};
use tempreport::error::{ConfigError, Error};
use tempreport::link::transport::Transport;
use tempreport::shutdown::ShutdownTrigger;

/// Exit status for rejected configuration.
const EXIT_INVALID_ARGUMENT: u8 = 1;
/// Exit status for every other failure.
const EXIT_FAILURE: u8 = 2;

// ── Signal handling ───────────────────────────────────────────
//
// The handler only stores into the trigger's atomic.  The interval sleep
// polls it in short slices and the loop acts on it at its next iteration.

static SHUTDOWN: OnceLock<ShutdownTrigger> = OnceLock::new();

extern "C" fn on_signal(_signum: libc::c_int) {
    if let Some(trigger) = SHUTDOWN.get() {
        trigger.fire();
    }
}

fn install_signal_handlers(trigger: ShutdownTrigger) {
    if SHUTDOWN.set(trigger).is_err() {
        warn!("signal handlers already installed");
        return;
    }
    let handler = on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
    for signum in [libc::SIGINT, libc::SIGTERM] {
        // SAFETY: `on_signal` is async-signal-safe: it performs one atomic
        // load and one atomic store.
        let previous = unsafe { libc::signal(signum, handler) };
        if previous == libc::SIG_ERR {
            warn!("could not install handler for signal {signum}");
        }
    }
}

// ── Entry point ───────────────────────────────────────────────

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(summary) => {
            info!(
                "done: {} emission(s), {} skipped, {} command(s), {} ignored, end={:?}",
                summary.emissions, summary.skipped, summary.commands, summary.ignored, summary.end
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit_status(&e))
        }
    }
}

fn exit_status(e: &anyhow::Error) -> u8 {
    let is_config = matches!(e.downcast_ref::<Error>(), Some(Error::Config(_)))
        || e.downcast_ref::<ConfigError>().is_some();
    if is_config {
        EXIT_INVALID_ARGUMENT
    } else {
        EXIT_FAILURE
    }
}

fn run(cli: Cli) -> Result<SessionSummary> {
    let source = cli.sensor_source();
    let config = cli.into_config().map_err(Error::from)?;

    let sensor: Box<dyn SensorPort> = match source {
        SensorSource::Sysfs(path) => Box::new(
            SysfsAdcSensor::open(&path)
                .map_err(Error::from)
                .with_context(|| format!("opening ADC channel {}", path.display()))?,
        ),
        SensorSource::Simulated(raw) => {
            info!("using simulated sensor (raw={raw})");
            Box::new(SimulatedSensor::new(raw))
        }
    };

    let log: Box<dyn TranscriptLog> = match &config.log_path {
        Some(path) => Box::new(
            FileLog::create(path)
                .map_err(|e| Error::Transcript(e.kind()))
                .with_context(|| format!("creating transcript {}", path.display()))?,
        ),
        None => Box::new(NullLog),
    };

    let trigger = ShutdownTrigger::new();
    install_signal_handlers(trigger.clone());

    match &config.transport {
        TransportTarget::Local => {
            run_session(&config, sensor, StdioTransport::new(), log, trigger)
        }
        TransportTarget::Tcp { host, port } => {
            let transport = TcpTransport::connect(host, *port)
                .map_err(Error::from)
                .with_context(|| format!("connecting to {host}:{port}"))?;
            run_session(&config, sensor, transport, log, trigger)
        }
        #[cfg(feature = "tls")]
        TransportTarget::Tls {
            host,
            port,
            ca_file,
            server_name,
        } => {
            use tempreport::adapters::tls::{TlsOptions, TlsTransport};

            let options = TlsOptions {
                ca_file: ca_file.clone(),
                server_name: server_name.clone(),
            };
            let transport = TlsTransport::connect(host, *port, &options)
                .map_err(Error::from)
                .with_context(|| format!("TLS connection to {host}:{port}"))?;
            run_session(&config, sensor, transport, log, trigger)
        }
        #[cfg(not(feature = "tls"))]
        TransportTarget::Tls { .. } => Err(Error::from(ConfigError::ValidationFailed(
            "built without the `tls` feature",
        ))
        .into()),
    }
}

fn run_session<T: Transport>(
    config: &SessionConfig,
    sensor: Box<dyn SensorPort>,
    transport: T,
    log: Box<dyn TranscriptLog>,
    trigger: ShutdownTrigger,
) -> Result<SessionSummary> {
    let reporter =
        Reporter::new(config, sensor, transport, SystemClock, log)?.with_shutdown_trigger(trigger);
    Ok(reporter.run()?)
}
