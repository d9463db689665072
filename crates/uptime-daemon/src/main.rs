//! Uptime node daemon entry point.
//!
//! Starts the uptime accumulator on a single-threaded runtime and serves the
//! uptime resource over HTTP until a shutdown signal arrives.

mod signals;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uptime_common::config::NodeConfig;
use uptime_core::{init, BootClock, HostTimer, UptimeResource};
use uptime_web::UptimeServer;

use crate::signals::wait_for_shutdown;

/// Uptime daemon command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "uptime-daemon",
    about = "Uptime node daemon - serves node uptime with content negotiation",
    version,
    long_about = None
)]
struct Args {
    /// Path to a node configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read uptime from the seconds-since-boot clock instead of the tick timer.
    #[arg(long, short = 'w')]
    wall_clock: bool,

    /// Address to bind the HTTP server to (overrides config file).
    #[arg(long, short = 'b', value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting uptime daemon");

    // Load configuration
    let mut config = load_config(&args)?;

    // Override with command-line arguments
    if args.wall_clock {
        config.timer.enabled = false;
    }
    if let Some(bind) = args.bind {
        config.web.bind_addr = bind;
    }

    info!(
        mode = %config.timer.mode(),
        ticks_per_second = config.timer.ticks_per_second,
        tick_max = config.timer.tick_max,
        sample_period = ?config.timer.sample_period,
        "Configuration loaded"
    );

    run_daemon(config).await
}

/// Initialize logging with the specified log level.
fn init_logging(level: &str) {
    let filter = format!(
        "uptime_daemon={},uptime_core={},uptime_web={},uptime_common={}",
        level, level, level, level
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_target(true)
        .init();
}

/// Config files searched when no `--config` is given, after `UPTIME_CONFIG_PATH`.
const CONFIG_SEARCH_PATHS: [&str; 2] = ["/etc/uptime/config.toml", "config/default.toml"];

/// Load configuration from file or use defaults.
///
/// An explicit `--config` must load. Otherwise the first existing file among
/// `UPTIME_CONFIG_PATH` and [`CONFIG_SEARCH_PATHS`] is used, falling back to
/// built-in defaults.
fn load_config(args: &Args) -> Result<NodeConfig> {
    if let Some(path) = &args.config {
        info!(?path, "Loading config from command-line argument");
        return read_config(path);
    }

    let env_path = std::env::var_os("UPTIME_CONFIG_PATH").map(PathBuf::from);
    if let Some(path) = env_path.as_ref().filter(|path| !path.exists()) {
        warn!(
            ?path,
            "UPTIME_CONFIG_PATH set but file does not exist, checking other locations"
        );
    }

    match config_candidates(env_path).into_iter().find(|path| path.exists()) {
        Some(path) => {
            info!(?path, "Loading config file");
            read_config(&path)
        }
        None => {
            info!("No config file found, using built-in defaults");
            Ok(NodeConfig::default())
        }
    }
}

/// Search order for config files without an explicit `--config`.
fn config_candidates(env_path: Option<PathBuf>) -> Vec<PathBuf> {
    env_path
        .into_iter()
        .chain(CONFIG_SEARCH_PATHS.iter().map(PathBuf::from))
        .collect()
}

fn read_config(path: &Path) -> Result<NodeConfig> {
    NodeConfig::from_file(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Start uptime tracking and serve until shutdown.
async fn run_daemon(config: NodeConfig) -> Result<()> {
    let boot_clock = Arc::new(BootClock::new());

    let clock = init(
        config.timer.enabled,
        &config.timer,
        HostTimer::new,
        boot_clock,
    )
    .context("Failed to initialize uptime tracking")?;

    let resource = UptimeResource::new(clock.clone(), config.resource.path.clone());
    let server = UptimeServer::new(config.web.clone(), resource, config.resource.chunk_size);

    server
        .serve(async {
            wait_for_shutdown().await;
        })
        .await
        .context("HTTP server failed")?;

    info!(
        uptime_secs = clock.uptime_seconds(),
        wall_clock_secs = clock.wall_clock_seconds(),
        mode = %clock.mode(),
        "Daemon shutdown complete"
    );

    Ok(())
}
