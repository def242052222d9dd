//! Entry point for the syspulse TUI. Parses args, resolves config and runs the App.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use syspulse::app::App;
use syspulse::config::{config_path, load_config_file, Config, ConfigLayer};
use syspulse::logging::{default_log_path, init_logging};
use syspulse::prefs::{load_prefs, prefs_path};
use syspulse::procs::SortColumn;

#[derive(Debug, Parser)]
#[command(
    name = "syspulse",
    version,
    about = "Live host metrics over WebSocket: CPU/memory charts, I/O rates and a process table"
)]
struct Cli {
    /// Metrics endpoint, e.g. ws://localhost:8000/ws/metrics
    #[arg(env = "SYSPULSE_WS_URL")]
    url: Option<String>,

    /// Samples kept in the rolling charts
    #[arg(short = 'n', long = "max-points", env = "SYSPULSE_MAX_POINTS")]
    max_points: Option<usize>,

    /// Delay before reconnecting after the stream drops
    #[arg(short = 'r', long = "reconnect-delay-ms", env = "SYSPULSE_RECONNECT_MS")]
    reconnect_delay_ms: Option<u64>,

    /// Config file (default: $XDG_CONFIG_HOME/syspulse/config.json)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log file (default: next to the config file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Initial process sort column (pid, name, cpu_percent, memory_percent, status, username)
    #[arg(short = 's', long, default_value_t = SortColumn::Cpu)]
    sort: SortColumn,

    /// Print the resolved configuration and exit without connecting
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let file = cli.config.clone().unwrap_or_else(config_path);
    let file_layer = load_config_file(&file)?;
    if cli.config.is_some() && file_layer.is_none() {
        bail!("config file {} does not exist", file.display());
    }
    let cli_layer = ConfigLayer {
        ws_url: cli.url.clone(),
        max_data_points: cli.max_points,
        reconnect_delay_ms: cli.reconnect_delay_ms,
    };
    let config = Config::resolve(file_layer.iter().chain([&cli_layer]))?;

    if cli.dry_run {
        println!("ws_url: {}", config.ws_url);
        println!("max_data_points: {}", config.max_data_points);
        println!("reconnect_delay_ms: {}", config.reconnect_delay.as_millis());
        return Ok(());
    }

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path);
    info!(
        url = %config.ws_url,
        max_points = config.max_data_points,
        reconnect_ms = config.reconnect_delay.as_millis() as u64,
        "starting syspulse"
    );

    let prefs_file = prefs_path();
    let prefs = load_prefs(&prefs_file);
    let mut app = App::new(config, prefs, prefs_file);
    app.sort_by(cli.sort);
    app.run().await
}
