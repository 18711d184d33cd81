// Module declarations for the application's core components
pub mod channels;      // Inter-component communication channels
pub mod config;        // Configuration management
pub mod error;         // Error handling and types
pub mod modbus;        // Modbus TCP/RTU transports
pub mod options;       // Command line options parsing
pub mod poller;        // Periodic device polling
pub mod prelude;       // Common imports and types
pub mod sample_writer; // Sample logging and JSON lines output
pub mod sunspec;       // SunSpec discovery, models and metrics

// Get the package version from Cargo.toml
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::prelude::*;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::modbus::ModbusConnections;
use crate::sample_writer::SampleWriter;

/// Installs the global logger. Output is gated at info until the configured
/// level is known, see `set_loglevel`.
pub fn init_logging() {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }

    log::set_max_level(log::LevelFilter::Info);
}

pub fn set_loglevel(level: &str) {
    match level.parse::<log::LevelFilter>() {
        Ok(level) => log::set_max_level(level),
        Err(_) => warn!("Unknown loglevel {:?}, staying at info", level),
    }
}

async fn runtime_limit(limit: Option<Duration>) {
    match limit {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}

/// Main application entry point
///
/// Builds the transports and devices from the config, then either polls
/// everything once (`--once`) or runs the poller and sample writer until a
/// shutdown signal or the runtime limit.
pub async fn app(
    mut shutdown_rx: broadcast::Receiver<()>,
    config: Arc<ConfigWrapper>,
    options: Options,
) -> Result<()> {
    info!("sunspec-bridge {} starting", CARGO_PKG_VERSION);

    let channels = Channels::new();
    let connections = ModbusConnections::new();
    let poller = Arc::new(Poller::new((*config).clone(), channels.clone(), &connections));
    info!(
        "  {} devices on {} connections",
        poller.devices().len(),
        connections.len()
    );

    if options.once {
        let samples = poller.poll_once().await;
        for sample in &samples {
            println!("{}", serde_json::to_string_pretty(sample)?);
        }
        poller.stop().await;

        let failed = poller.devices().len() - samples.len();
        if failed > 0 {
            bail!("{} of {} devices failed to poll", failed, poller.devices().len());
        }
        return Ok(());
    }

    info!("  Creating SampleWriter...");
    let sample_writer = SampleWriter::new(config.sample_file().as_deref())?;
    let sample_writer_clone = sample_writer.clone();
    let receiver = channels.from_poller.subscribe();
    let sample_writer_handle = tokio::spawn(async move {
        if let Err(e) = sample_writer_clone.run(receiver).await {
            error!("SampleWriter task failed: {}", e);
        }
    });

    info!("  Creating Poller...");
    let poller_clone = poller.clone();
    let poller_handle = tokio::spawn(async move {
        if let Err(e) = poller_clone.start().await {
            error!("Poller task failed: {}", e);
        }
    });

    tokio::select! {
        _ = shutdown_rx.recv() => info!("Shutdown signal received, stopping components..."),
        _ = runtime_limit(options.runtime.map(Duration::from_secs)) => {
            info!("Runtime limit reached, stopping components...")
        }
    }

    // poller first, so the writer sees every sample sent before it stops
    let _ = channels.to_poller.send(poller::ChannelData::Shutdown);
    if let Err(e) = poller_handle.await {
        error!("Error waiting for poller task: {}", e);
    }

    let _ = channels.from_poller.send(poller::ChannelData::Shutdown);
    if let Err(e) = sample_writer_handle.await {
        error!("Error waiting for sample writer task: {}", e);
    }

    info!(
        "Application shutdown complete, {} samples written",
        sample_writer.samples_written()
    );
    Ok(())
}
