mod app_state;
mod controller;
mod health;
mod oneshot;
mod tui;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use webagent_sdk::{BackendClient, BackendConfig};

use crate::app_state::AppController;
use crate::health::HealthMonitor;
use crate::oneshot::OneShot;
use crate::tui::EventHandler;
use crate::ui::popup::PopupApp;

/// Redraw cadence of the interactive popup, in milliseconds.
const TICK_RATE_MS: u64 = 250;

#[derive(Parser, Debug)]
#[command(name = "webagent-popup")]
#[command(about = "Terminal popup for the WebAgent backend")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Backend base address (overrides WEBAGENT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Seconds between health checks (overrides WEBAGENT_HEALTH_INTERVAL_SECS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub health_interval: Option<u64>,

    /// Per-request timeout in seconds, 0 disables it (overrides WEBAGENT_REQUEST_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub request_timeout: Option<u64>,

    /// Write logs to this file. The interactive popup only logs when set.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Open the interactive popup (default)
    Tui,
    /// Print the backend connection status
    Health,
    /// Send a query to the agent
    Ask {
        /// Query text; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Send an email through the backend
    SendEmail {
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
    },
    /// Summarise unread emails
    FetchEmails,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    fn backend_config(&self, mut config: BackendConfig) -> BackendConfig {
        if let Some(url) = &self.api_url {
            config.base_url.clone_from(url);
        }
        if let Some(secs) = self.health_interval {
            config.health_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.request_timeout {
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        config
    }

    /// `None` means the interactive popup.
    fn one_shot(&self) -> Option<OneShot> {
        match self.command.clone()? {
            Commands::Tui => None,
            Commands::Health => Some(OneShot::Health),
            Commands::Ask { query } => Some(OneShot::Ask {
                query: query.join(" "),
            }),
            Commands::SendEmail {
                recipient,
                subject,
                body,
            } => Some(OneShot::SendEmail {
                recipient,
                subject,
                body,
            }),
            Commands::FetchEmails => Some(OneShot::FetchEmails),
        }
    }
}

fn init_logging(log_file: Option<&PathBuf>, interactive: bool) -> anyhow::Result<()> {
    let default_level = if interactive { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // The popup owns the terminal; stderr output would corrupt it.
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn run_popup(client: BackendClient, config: &BackendConfig) -> anyhow::Result<()> {
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(TICK_RATE_MS);

    let monitor = HealthMonitor::spawn(client.clone(), config.health_interval, events.get_sender());
    let mut app = PopupApp::new(client, events.get_sender());

    let result: anyhow::Result<()> = async {
        loop {
            terminal.draw(|f| app.render(f))?;
            let Some(action) = events.next_async().await else {
                break;
            };
            app.update(action);
            if app.should_quit() {
                break;
            }
        }
        Ok(())
    }
    .await;

    if !monitor.is_running() {
        warn!("health monitor stopped before the popup closed");
    }
    drop(monitor);
    tui::restore()?;
    result
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let one_shot = cli.one_shot();

    init_logging(cli.log_file.as_ref(), one_shot.is_none())?;

    let config = cli.backend_config(BackendConfig::from_env());
    let client = BackendClient::new(&config).context("invalid backend configuration")?;
    info!(
        url = %client.endpoints().base(),
        health_interval_secs = config.health_interval.as_secs(),
        "backend configured"
    );

    match one_shot {
        Some(command) => Ok(oneshot::run(&client, &command).await),
        None => {
            run_popup(client, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
