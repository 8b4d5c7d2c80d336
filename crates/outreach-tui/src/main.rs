//! `outreach`: terminal console for LinkedIn outreach campaigns.
//!
//! Built on [ratatui](https://ratatui.rs) over `outreach-core`'s cached
//! [`Console`](outreach_core::Console). Three screens, reachable with the
//! number keys or by route: Campaigns (`/`), Message Generator
//! (`/message-generator`) and Leads Scraper (`/leads`).
//!
//! Logs are written to a file (default `/tmp/outreach.log`) to avoid
//! corrupting the terminal UI. A background data bridge refetches cached
//! reads whenever a mutation invalidates them.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use outreach_core::{BackendClient, Console};

use crate::app::App;
use crate::screen::ScreenId;

/// Manage outreach campaigns, scrape leads and draft messages.
#[derive(Parser, Debug)]
#[command(name = "outreach", version, about)]
struct Cli {
    /// Backend base URL (e.g., http://localhost:3000)
    #[arg(short = 'u', long, env = "OUTREACH_API_URL")]
    api_url: Option<String>,

    /// Screen to open first: /, /message-generator or /leads
    #[arg(short, long, default_value = "/")]
    route: String,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file path (defaults to /tmp/outreach.log)
    #[arg(long, default_value = "/tmp/outreach.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may go to stdout/stderr while the
/// terminal is in raw mode. The guard must live until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "outreach_tui={log_level},outreach_core={log_level},outreach_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("outreach.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Build the console from config, with `--api-url` taking priority.
fn build_console(cli: &Cli) -> Result<Console> {
    let config = match &cli.config {
        Some(path) => outreach_config::load_config_from(path),
        None => outreach_config::load_config(),
    }
    .wrap_err("failed to load configuration")?;

    let base_url = cli.api_url.clone().or_else(|| config.backend.url.clone());
    let client = BackendClient::new(base_url, &config.transport())
        .wrap_err("failed to build backend client")?;

    Ok(Console::new(client, config.to_console_config()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches to raw mode.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let console = build_console(&cli)?;
    let start = ScreenId::from_route(&cli.route);
    info!(
        api_url = console.client().base_url().unwrap_or("(not set)"),
        route = %cli.route,
        "starting outreach console"
    );

    let mut app = App::new(console, start);
    app.run().await?;

    Ok(())
}
