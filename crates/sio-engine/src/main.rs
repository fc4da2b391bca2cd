//! sio-client: command-line Socket.IO client.
//!
//! Connects to a Socket.IO (protocol v1) server, optionally emits one event,
//! and prints every packet it receives until the server disconnects, the
//! requested number of packets has arrived, or Ctrl+C is pressed.
//!
//! # Usage
//!
//! ```text
//! sio-client [OPTIONS] --url <URL>
//!
//! Options:
//!   --url      <URL>     Base URL, e.g. http://localhost:8080/socket.io/
//!   --origin   <ORIGIN>  Origin header for the WebSocket upgrade
//!   --timeout  <SECS>    Handshake, read and write timeout [default: 30]
//!   --endpoint <NS>      Namespace to join, e.g. /chat
//!   --config   <PATH>    TOML engine config (timeouts)
//!   --emit     <NAME>    Event to emit after connecting
//!   --args     <JSON>    JSON array of event arguments [default: []]
//!   --ack                Ask the server for a data ack
//!   --count    <N>       Exit after N packets
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable      | Description              |
//! |---------------|--------------------------|
//! | `SIO_URL`     | Base URL                 |
//! | `SIO_ORIGIN`  | Origin header            |
//! | `SIO_TIMEOUT` | Timeout in seconds       |
//! | `SIO_CONFIG`  | Path to the TOML config  |
//!
//! Log output is controlled by `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::Value;
use sio_core::Payload;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sio_engine::domain::EngineConfig;
use sio_engine::{dial_with, ConnectionOptions};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Command-line Socket.IO client.
#[derive(Debug, Parser)]
#[command(
    name = "sio-client",
    about = "Connects to a Socket.IO server, emits an event and prints what comes back",
    version
)]
struct Cli {
    /// Base URL of the Socket.IO server (http only).
    #[arg(long, env = "SIO_URL")]
    url: String,

    /// Origin header sent with the WebSocket upgrade.
    #[arg(long, default_value = "http://localhost", env = "SIO_ORIGIN")]
    origin: String,

    /// Timeout in seconds for the handshake and for every read and write.
    ///
    /// Overrides the timeouts from `--config`.
    #[arg(long, env = "SIO_TIMEOUT")]
    timeout: Option<u64>,

    /// Namespace to join after connecting.
    #[arg(long, default_value = "")]
    endpoint: String,

    /// TOML engine configuration file.
    #[arg(long, env = "SIO_CONFIG")]
    config: Option<PathBuf>,

    /// Name of an event to emit once connected.
    #[arg(long)]
    emit: Option<String>,

    /// JSON array of arguments for `--emit`.
    #[arg(long, default_value = "[]")]
    args: String,

    /// Request a data ack for the emitted event.
    #[arg(long)]
    ack: bool,

    /// Stop after this many packets (0 = until disconnected).
    #[arg(long, default_value_t = 0)]
    count: u64,
}

/// Default timeout when neither `--timeout` nor `--config` is given.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl Cli {
    /// Builds the connection options from `--config`, `--timeout` and
    /// `--endpoint`.
    fn connection_options(&self) -> anyhow::Result<ConnectionOptions> {
        let options = match &self.config {
            Some(path) => {
                let config = EngineConfig::load(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?;
                let options = ConnectionOptions::from_config(&config);
                match self.timeout {
                    Some(secs) => options.with_timeout(Duration::from_secs(secs)),
                    None => options,
                }
            }
            None => ConnectionOptions::default().with_timeout(Duration::from_secs(
                self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
            )),
        };
        Ok(options.with_endpoint(self.endpoint.clone()))
    }

    /// Parses `--args` as a JSON array.
    fn emit_args(&self) -> anyhow::Result<Vec<Value>> {
        let value: Value = serde_json::from_str(&self.args)
            .with_context(|| format!("--args is not valid JSON: {}", self.args))?;
        match value {
            Value::Array(items) => Ok(items),
            other => bail!("--args must be a JSON array, got {other}"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let options = cli.connection_options()?;
    let emit_args = cli.emit_args()?;

    let conn = dial_with(&cli.url, &cli.origin, options)
        .await
        .with_context(|| format!("failed to connect to {}", cli.url))?;
    info!("connected, session {}", conn.session_id());

    if let Some(name) = &cli.emit {
        let id = conn
            .emit(cli.ack, name, &emit_args)
            .await
            .with_context(|| format!("failed to emit {name:?}"))?;
        info!("emitted {name:?} with id {id}");
    }

    // ── Receive loop ──────────────────────────────────────────────────────────
    let mut received = 0u64;
    loop {
        if cli.count != 0 && received >= cli.count {
            break;
        }
        let packet = tokio::select! {
            result = conn.receive() => result,
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, closing");
                break;
            }
        };
        match packet {
            Ok(packet) => {
                received += 1;
                println!("{}", render(packet.payload()));
            }
            Err(e) if e.is_end_of_stream() => {
                info!("server disconnected");
                return Ok(());
            }
            Err(e) => {
                let _ = conn.close().await;
                return Err(e).context("receive failed");
            }
        }
    }

    conn.close().await.context("failed to close connection")?;
    Ok(())
}

/// One line of output per packet.
fn render(payload: &Payload) -> String {
    match payload {
        Payload::Event { name, args } => {
            format!("event {name} {}", Value::Array(args.clone()))
        }
        Payload::Text(text) => format!("message {text}"),
        Payload::Json(value) => format!("json {value}"),
        Payload::Connect { query } if query.is_empty() => "connect".to_string(),
        Payload::Connect { query } => format!("connect {query}"),
        other => other.kind().name().to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
