//! Server configuration.
//!
//! Values come from an optional TOML file overlaid by environment variables
//! prefixed with `SQUALL_`; nested keys use `__`, so
//! `SQUALL_OPENWEATHER__API_KEY` sets `openweather.api_key`. Every field has a
//! default, so an empty environment yields a runnable (if key-less) server.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

/// Top-level settings for the `squall` binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub host:                  String,
  pub port:                  u16,
  /// Free-form label reported by the info endpoints.
  pub environment:           String,
  pub store_path:            PathBuf,
  pub poll_interval_secs:    u64,
  pub delivery_timeout_secs: u64,
  pub openweather:           OpenWeatherSettings,
  /// Email delivery is disabled when absent.
  pub smtp:                  Option<SmtpSettings>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      host:                  "0.0.0.0".to_string(),
      port:                  3001,
      environment:           "development".to_string(),
      store_path:            PathBuf::from("alerts.db"),
      poll_interval_secs:    3 * 60 * 60,
      delivery_timeout_secs: 10,
      openweather:           OpenWeatherSettings::default(),
      smtp:                  None,
    }
  }
}

impl Settings {
  /// Read `path` (if it exists) and then the `SQUALL_*` environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    let settings: Self = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("SQUALL")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?
      .try_deserialize()?;
    settings.validate()?;
    Ok(settings)
  }

  /// Durations must be at least one second.
  pub fn validate(&self) -> Result<(), config::ConfigError> {
    for (key, secs) in [
      ("poll_interval_secs", self.poll_interval_secs),
      ("delivery_timeout_secs", self.delivery_timeout_secs),
      ("openweather.timeout_secs", self.openweather.timeout_secs),
    ] {
      if secs == 0 {
        return Err(config::ConfigError::Message(format!("{key} must be at least 1")));
      }
    }
    Ok(())
  }

  pub fn poll_interval(&self) -> Duration { Duration::from_secs(self.poll_interval_secs) }

  pub fn delivery_timeout(&self) -> Duration { Duration::from_secs(self.delivery_timeout_secs) }

  pub fn listen_address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// OpenWeatherMap access.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenWeatherSettings {
  pub api_key:      Option<String>,
  pub base_url:     String,
  pub timeout_secs: u64,
}

impl Default for OpenWeatherSettings {
  fn default() -> Self {
    Self {
      api_key:      None,
      base_url:     "https://api.openweathermap.org/data/2.5".to_string(),
      timeout_secs: 10,
    }
  }
}

impl OpenWeatherSettings {
  /// The configured key, ignoring blank values.
  pub fn api_key(&self) -> Option<&str> {
    self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
  }
}

/// Outbound SMTP relay.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
  pub host:     String,
  #[serde(default = "default_smtp_port")]
  pub port:     u16,
  pub username: Option<String>,
  pub password: Option<String>,
  /// Sender mailbox, e.g. `"Squall <alerts@example.com>"`.
  pub from:     String,
  /// STARTTLS on `port` when set; implicit TLS otherwise.
  #[serde(default = "default_starttls")]
  pub starttls: bool,
}

fn default_smtp_port() -> u16 { 587 }

fn default_starttls() -> bool { true }
