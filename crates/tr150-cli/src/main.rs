//! `tr150`: drive the printer/scanner bridge from the command line.
//!
//! Reads JSON requests from stdin, one per line, and writes JSON results and
//! decode events to stdout. Peripherals are the mock printer and scanner, so
//! scans are simulated with `{"op":"scan",...}` requests. Logs go to stderr.

mod protocol;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tr150_bridge::{BridgeConfig, BridgeFacade, HostSignal, ReturnCodePolicy};
use tr150_hardware::PeripheralAdapter;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::protocol::{Output, Request};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bridge configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report non-zero printer return codes as failures
    #[arg(long)]
    strict: bool,

    /// Attach and resume the host on startup
    #[arg(long)]
    foreground: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<BridgeConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            BridgeConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => BridgeConfig::default(),
    };
    if args.strict {
        config = config.with_return_code_policy(ReturnCodePolicy::Strict);
    }
    Ok(config)
}

/// Write each output as one JSON line, flushing per line.
async fn write_outputs<W>(mut writer: W, mut outputs: mpsc::UnboundedReceiver<Output>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(output) = outputs.recv().await {
        let mut line = serde_json::to_vec(&output)?;
        line.push(b'\n');
        writer.write_all(&line).await.context("writing output")?;
        writer.flush().await.context("flushing output")?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let (adapter, mocks) = PeripheralAdapter::mock();
    let bridge = BridgeFacade::start(adapter, config)?;
    info!(version = tr150_core::VERSION, "tr150 bridge ready");

    if args.foreground {
        bridge.host_signal(HostSignal::Attached).await?;
        bridge.on_host_resume().await?;
    }

    let (out, outputs) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_outputs(tokio::io::stdout(), outputs));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = match serde_json::from_str::<Request>(line) {
            Ok(request) => protocol::handle(&bridge, &mocks, request, &out).await,
            Err(e) => {
                warn!(error = %e, "Invalid request");
                Output::Error {
                    message: format!("invalid request: {e}"),
                }
            }
        };
        if out.send(output).is_err() {
            break;
        }
    }

    // Ends any event stream, which lets the forwarding tasks finish.
    bridge.shutdown().await?;
    drop(out);
    writer.await??;

    info!("stdin closed, bye");
    Ok(())
}
