//! Wiegand gateway command-line application.
//!
//! Runs the decoder over a captured edge log or a simulated reader and
//! prints every publication as a `topic payload` line on stdout. Logs go to
//! stderr, so stdout can be piped straight into `mosquitto_pub -l`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiegand_core::{Bits, Line};
use wiegand_gateway::{Gateway, GatewayStats};
use wiegand_hardware::devices::AnyEdgeSource;
use wiegand_hardware::mock::MockEdgeSource;
use wiegand_hardware::replay::ReplayEdgeSource;
use wiegand_hardware::sinks::TopicWriterSink;
use wiegand_protocol::{FormatDecoder, FramePublisher, RawFrame, WireFormat, encode};

mod config;

use config::{AppConfig, Overrides};

/// Wiegand reader gateway - decode card reads and publish them as topics
#[derive(Parser, Debug)]
#[command(name = "wiegand-gateway")]
#[command(about = "Decode Wiegand card reads and publish them as retained topics", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (default: /etc/wiegand-gateway.toml if present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Device id used in topics (/devices/<ID>/...)
    #[arg(short, long, value_name = "ID", global = true)]
    device: Option<String>,

    /// Do not publish device meta on startup
    #[arg(long, global = true)]
    skip_meta: bool,

    /// Swap D0/D1 (miswired reader)
    #[arg(long, global = true)]
    swap_lines: bool,

    /// Invert every captured bit before decoding
    #[arg(long, global = true)]
    invert_bits: bool,

    /// Reverse bit order before decoding
    #[arg(long, global = true)]
    reverse_bits: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a capture file ("<micros> <D0|D1>" per line)
    Replay {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Pulse out encoded credentials through a simulated reader
    Simulate {
        #[arg(long)]
        facility: u32,

        #[arg(long)]
        card: u32,

        /// w26 or w34
        #[arg(long, default_value = "w26")]
        format: WireFormat,

        /// Number of reads
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Pause between reads in milliseconds
        #[arg(long, value_name = "MS", default_value_t = 250)]
        gap_ms: u64,
    },

    /// Decode a bit string such as 10111101110110010011011101
    Decode {
        #[arg(value_name = "BITS")]
        bits: Bits,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);
    tracing::debug!("wiegand-gateway v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::resolve_config(args.config.as_deref())?;
    Overrides {
        device: args.device,
        skip_meta: args.skip_meta,
        swap_lines: args.swap_lines,
        invert_bits: args.invert_bits,
        reverse_bits: args.reverse_bits,
    }
    .apply(&mut config)?;
    config.validate()?;

    match args.command {
        Command::Decode { bits } => decode_mode(&config, bits),
        Command::Replay { file } => {
            let source = ReplayEdgeSource::open(&file)
                .with_context(|| format!("Failed to load capture: {}", file.display()))?;
            block_on(run_gateway(source.into(), &config))?;
            Ok(())
        }
        Command::Simulate {
            facility,
            card,
            format,
            count,
            gap_ms,
        } => {
            let bits = encode(format, facility, card)
                .with_context(|| format!("Cannot encode {facility}/{card} as {format}"))?;
            block_on(simulate(&config, bits, count, Duration::from_millis(gap_ms)))?;
            Ok(())
        }
    }
}

/// Decode one frame offline and print its publications
fn decode_mode(config: &AppConfig, bits: Bits) -> Result<()> {
    let decoded = FormatDecoder::new(config.decoder.clone()).decode(&RawFrame::new(bits, 1));
    let publisher = FramePublisher::new(config.device_id.clone());

    let mut out = io::stdout().lock();
    for publication in publisher.frame_values(&decoded) {
        writeln!(out, "{} {}", publication.topic, publication.payload)?;
    }
    Ok(())
}

async fn simulate(
    config: &AppConfig,
    bits: Bits,
    count: usize,
    gap: Duration,
) -> Result<GatewayStats> {
    let (source, handle) = MockEdgeSource::with_name("simulator".to_string());
    let settle = config.capture.frame_timeout() + config.capture.poll_interval() * 2;

    // The simulated reader is wired correctly; --swap-lines shows what a
    // miswired installation decodes to.
    tokio::spawn(async move {
        for i in 0..count {
            if i > 0 {
                tokio::time::sleep(gap).await;
            }
            if let Err(e) = handle.send_bits(&bits, Line::D1, Duration::from_millis(2)).await {
                tracing::warn!(error = %e, "Simulator stopped");
                return;
            }
        }
        // Let the last frame time out before the source disconnects.
        tokio::time::sleep(settle).await;
    });

    run_gateway(source.into(), config).await
}

async fn run_gateway(source: AnyEdgeSource, config: &AppConfig) -> Result<GatewayStats> {
    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let sink = TopicWriterSink::new(io::stdout());
    let mut gateway = Gateway::builder(source, sink)
        .capture(config.capture.clone())
        .decoder(config.decoder.clone())
        .device_id(config.device_id.clone())
        .skip_meta(config.skip_meta)
        .build()?;

    let stats = gateway.run(&cancel).await?;
    Ok(stats)
}

#[cfg(unix)]
async fn cancel_on_signal(cancel: CancellationToken) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(terminate) => terminate,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot listen for SIGTERM");
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT"),
        _ = terminate.recv() => tracing::info!("Received SIGTERM"),
    }
    cancel.cancel();
}

#[cfg(not(unix))]
async fn cancel_on_signal(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Received Ctrl-C");
        cancel.cancel();
    }
}

/// Run `future` on a single-threaded runtime
fn block_on<F: std::future::Future<Output = Result<GatewayStats>>>(future: F) -> Result<GatewayStats> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?
        .block_on(future)
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` takes precedence over `-v` / `-q` when set.
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
