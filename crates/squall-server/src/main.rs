//! squall server binary.
//!
//! Reads `squall.toml` (or the path given with `--config`) plus `SQUALL_*`
//! environment variables, opens the SQLite subscriber store, starts the poll
//! scheduler and serves the JSON API over HTTP.
//!
//! # One-shot mode
//!
//! To run a single alert check (e.g. from cron) without serving HTTP:
//!
//! ```
//! cargo run -p squall-server --bin squall -- --check-once
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use squall_api::{AppState, ServiceInfo};
use squall_core::rules::RuleEngine;
use squall_relay::{CityOutcome, CycleReport, Notifier, Orchestrator, Scheduler};
use squall_server::{OpenWeatherClient, Settings, SmtpChannel};
use squall_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Squall weather alert relay")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "squall.toml")]
  config: PathBuf,

  /// Run one alert check over every subscribed city and exit.
  #[arg(long)]
  check_once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(&cli.config).context("failed to read configuration")?;

  // Open SQLite store.
  let store_path = expand_tilde(&settings.store_path);
  let store = Arc::new(
    SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?,
  );

  let api_key_configured = settings.openweather.api_key().is_some();
  if !api_key_configured {
    warn!("no OpenWeatherMap API key configured; weather lookups and polling are disabled");
  }

  let weather = Arc::new(
    OpenWeatherClient::new(&settings.openweather).context("failed to build HTTP client")?,
  );

  let mail = SmtpChannel::new(settings.smtp.as_ref()).context("invalid SMTP settings")?;
  let email_configured = mail.is_configured();
  if !email_configured {
    warn!("SMTP not configured; email alerts will be recorded as failed deliveries");
  }

  let notifier =
    Notifier::new(mail, settings.delivery_timeout()).context("failed to compile alert templates")?;
  let orchestrator =
    Arc::new(Orchestrator::new(Arc::clone(&store), RuleEngine::default(), notifier));
  let scheduler = Arc::new(Scheduler::new(
    Arc::clone(&store),
    Arc::clone(&weather),
    Arc::clone(&orchestrator),
    settings.poll_interval(),
  ));

  // Helper mode: one cycle, then exit.
  if cli.check_once {
    anyhow::ensure!(api_key_configured, "an OpenWeatherMap API key is required for --check-once");
    let report = scheduler.run_cycle().await;
    log_cycle(&report);
    store.close().await.context("failed to close store")?;
    return Ok(());
  }

  let poller = api_key_configured.then(|| tokio::spawn(Arc::clone(&scheduler).run()));

  let state = AppState {
    store:        Arc::clone(&store),
    weather,
    orchestrator,
    info:         Arc::new(ServiceInfo {
      service:            "Squall Weather Alert API".to_string(),
      version:            env!("CARGO_PKG_VERSION").to_string(),
      environment:        settings.environment.clone(),
      port:               settings.port,
      api_key_configured,
      email_configured,
    }),
  };

  let app = squall_api::router(state);
  let address = settings.listen_address();

  info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  info!("shutting down");
  if let Some(poller) = poller {
    poller.abort();
  }
  store.close().await.context("failed to close store")?;

  Ok(())
}

/// Completes on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      warn!(error = %e, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut signal) => {
        signal.recv().await;
      }
      Err(e) => {
        warn!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }
}

fn log_cycle(report: &CycleReport) {
  for (city, outcome) in &report.cities {
    match outcome {
      CityOutcome::Processed(r) => info!(
        %city,
        triggered = r.triggered.len(),
        delivered = r.delivered,
        failed = r.failures.len(),
        "city checked"
      ),
      CityOutcome::FetchFailed(e) => warn!(%city, error = %e, "weather fetch failed"),
      CityOutcome::StoreFailed(e) => warn!(%city, error = %e, "subscriber lookup failed"),
    }
  }
  info!(cities = report.cities.len(), "check complete");
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
