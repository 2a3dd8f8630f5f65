//! tincan entry point.
//!
//! One binary, two roles: `--listen` hosts the chat on the fixed loopback
//! port, anything else joins one. Without `--connect` the address comes
//! from the config file, or failing that from the in-UI form.

use std::{
    fs::OpenOptions,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::Parser;
use tincan_core::PeerAddr;
use tincan_net::transport;
use tincan_tui::{Runtime, Theme, config};
use tracing_subscriber::EnvFilter;

/// tincan chat client and host
#[derive(Parser, Debug)]
#[command(name = "tincan")]
#[command(about = "Two-process text chat over a single raw TCP link")]
#[command(version)]
struct Args {
    /// Host the chat, optionally at ADDR (default 127.0.0.1:9092)
    #[arg(short, long, value_name = "ADDR", num_args = 0..=1)]
    listen: Option<Option<SocketAddr>>,

    /// Join a chat at host:port, skipping the config file's address
    #[arg(short, long, value_name = "ADDR", conflicts_with = "listen")]
    connect: Option<PeerAddr>,

    /// Config file read on start and written by the first-run form
    #[arg(long, value_name = "PATH", default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Append logs to this file; without it logging stays off, since the
    /// terminal itself is busy drawing the UI
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log filter when --log-file is set (e.g. "debug", "tincan_net=trace")
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let runtime = match (args.listen, args.connect) {
        (Some(bind), _) => {
            let bind_addr = bind.unwrap_or(transport::DEFAULT_BIND_ADDR);
            Runtime::host(bind_addr, Theme::DARK, args.config)?
        },
        (None, Some(addr)) => {
            let (_, theme) = resolve_config(&args.config);
            Runtime::join(Some(addr), theme, args.config)?
        },
        (None, None) => {
            let (addr, theme) = resolve_config(&args.config);
            Runtime::join(addr, theme, args.config)?
        },
    };

    Ok(runtime.run().await?)
}

/// Address and palette from the persisted config.
///
/// Anything wrong with the file (missing, malformed, stale address) falls
/// back to no address, which sends the dialer to the in-UI form.
fn resolve_config(path: &Path) -> (Option<PeerAddr>, Theme) {
    match config::load(path) {
        Ok(Some(chat_config)) => {
            let theme = Theme::named(&chat_config.theme);
            match chat_config.peer_addr() {
                Ok(addr) => (Some(addr), theme),
                Err(err) => {
                    tracing::warn!(%err, "persisted address is invalid; it will not be used");
                    (None, theme)
                },
            }
        },
        Ok(None) => (None, Theme::DARK),
        Err(err) => {
            tracing::warn!(%err, "could not read the config file; it will not be used");
            (None, Theme::DARK)
        },
    }
}

/// Route tracing to the file from `--log-file`.
fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
