//! Weather observations and the provider abstraction that produces them.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::FetchError;

/// Geographic position of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub lat: f64,
  pub lon: f64,
}

/// A point-in-time observation for one named location. Immutable input to the
/// rule engine; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
  /// The provider's canonical city name.
  pub city:          String,
  /// Primary condition category, e.g. `"Rain"` or `"Clear"`.
  pub condition:     String,
  /// Human-readable condition, e.g. `"light rain"`.
  pub description:   String,
  pub temperature_c: f64,
  pub wind_speed_ms: f64,
  /// Relative humidity, percent.
  pub humidity:      f64,
  /// Sea-level pressure, hPa.
  pub pressure_hpa:  f64,
  pub coordinates:   Coordinates,
  pub observed_at:   DateTime<Utc>,
}

impl WeatherSnapshot {
  pub fn wind_speed_kmh(&self) -> f64 { self.wind_speed_ms * 3.6 }
}

/// One step of a multi-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
  pub forecast_at:   DateTime<Utc>,
  pub condition:     String,
  pub description:   String,
  pub temperature_c: f64,
  pub wind_speed_ms: f64,
  pub humidity:      f64,
}

impl ForecastEntry {
  pub fn date(&self) -> NaiveDate { self.forecast_at.date_naive() }
}

/// Reduce a step-wise forecast to the first entry of each calendar day (UTC),
/// keeping at most `days` days in chronological order of first appearance.
pub fn daily_forecast(entries: Vec<ForecastEntry>, days: usize) -> Vec<ForecastEntry> {
  let mut out: Vec<ForecastEntry> = Vec::with_capacity(days);
  for entry in entries {
    if out.len() == days {
      break;
    }
    if out.iter().any(|e| e.date() == entry.date()) {
      continue;
    }
    out.push(entry);
  }
  out
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an external weather data source.
///
/// Implementations perform exactly one lookup per call and never retry.
pub trait WeatherProvider: Send + Sync {
  /// Fetch the current observation for `city`.
  fn current<'a>(
    &'a self,
    city: &'a str,
  ) -> impl Future<Output = Result<WeatherSnapshot, FetchError>> + Send + 'a;

  /// Fetch the step-wise forecast for `city`, oldest step first.
  fn forecast<'a>(
    &'a self,
    city: &'a str,
  ) -> impl Future<Output = Result<Vec<ForecastEntry>, FetchError>> + Send + 'a;
}
