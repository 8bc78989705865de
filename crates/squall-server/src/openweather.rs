//! [`OpenWeatherClient`]: a [`WeatherProvider`] backed by the OpenWeatherMap
//! 2.5 REST API (`/weather` and `/forecast`, metric units).

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use squall_core::{
  FetchError,
  weather::{Coordinates, ForecastEntry, WeatherProvider, WeatherSnapshot},
};
use tracing::debug;

use crate::settings::OpenWeatherSettings;

/// Async HTTP client for OpenWeatherMap.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based. Each lookup
/// is a single request with no retry.
#[derive(Clone)]
pub struct OpenWeatherClient {
  client:   Client,
  base_url: String,
  api_key:  String,
}

impl OpenWeatherClient {
  pub fn new(settings: &OpenWeatherSettings) -> reqwest::Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(settings.timeout_secs))
      .build()?;
    Ok(Self {
      client,
      base_url: settings.base_url.trim_end_matches('/').to_string(),
      api_key: settings.api_key().unwrap_or_default().to_string(),
    })
  }

  fn url(&self, endpoint: &str) -> String { format!("{}/{endpoint}", self.base_url) }

  async fn get<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<T, FetchError> {
    debug!(%endpoint, %city, "requesting weather data");
    let resp = self
      .client
      .get(self.url(endpoint))
      .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
      .send()
      .await
      .map_err(classify_transport)?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(classify_status(status, city, &body));
    }

    resp.json().await.map_err(|e| FetchError::Upstream {
      status:  Some(status.as_u16()),
      message: format!("malformed response: {e}"),
    })
  }
}

impl WeatherProvider for OpenWeatherClient {
  async fn current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
    self.get::<RawCurrent>("weather", city).await?.into_snapshot()
  }

  async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, FetchError> {
    self
      .get::<RawForecast>("forecast", city)
      .await?
      .list
      .into_iter()
      .map(RawForecastItem::into_entry)
      .collect()
  }
}

// ─── Error classification ────────────────────────────────────────────────────

fn classify_transport(e: reqwest::Error) -> FetchError {
  if e.is_timeout() {
    FetchError::Timeout
  } else if e.is_connect() {
    FetchError::NetworkUnavailable(e.to_string())
  } else {
    FetchError::Upstream { status: e.status().map(|s| s.as_u16()), message: e.to_string() }
  }
}

fn classify_status(status: StatusCode, city: &str, body: &str) -> FetchError {
  match status {
    StatusCode::NOT_FOUND => FetchError::NotFound(city.to_string()),
    StatusCode::UNAUTHORIZED => FetchError::Unauthorized,
    StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited,
    _ => FetchError::Upstream {
      status:  Some(status.as_u16()),
      message: serde_json::from_str::<RawError>(body)
        .map(|e| e.message)
        .unwrap_or_default(),
    },
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawError {
  #[serde(default)]
  message: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawCondition {
  main:        String,
  description: String,
}

#[derive(Debug, Deserialize)]
struct RawMain {
  temp:     f64,
  humidity: f64,
  #[serde(default)]
  pressure: f64,
}

#[derive(Debug, Default, Deserialize)]
struct RawWind {
  #[serde(default)]
  speed: f64,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
  name:    String,
  #[serde(default)]
  weather: Vec<RawCondition>,
  main:    RawMain,
  #[serde(default)]
  wind:    RawWind,
  coord:   Coordinates,
  dt:      i64,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
  list: Vec<RawForecastItem>,
}

#[derive(Debug, Deserialize)]
struct RawForecastItem {
  dt:      i64,
  main:    RawMain,
  #[serde(default)]
  weather: Vec<RawCondition>,
  #[serde(default)]
  wind:    RawWind,
}

fn timestamp(dt: i64) -> Result<DateTime<Utc>, FetchError> {
  DateTime::from_timestamp(dt, 0).ok_or_else(|| FetchError::Upstream {
    status:  None,
    message: format!("timestamp out of range: {dt}"),
  })
}

impl RawCurrent {
  fn into_snapshot(self) -> Result<WeatherSnapshot, FetchError> {
    let condition = self.weather.into_iter().next().unwrap_or_default();
    Ok(WeatherSnapshot {
      city:          self.name,
      condition:     condition.main,
      description:   condition.description,
      temperature_c: self.main.temp,
      wind_speed_ms: self.wind.speed,
      humidity:      self.main.humidity,
      pressure_hpa:  self.main.pressure,
      coordinates:   self.coord,
      observed_at:   timestamp(self.dt)?,
    })
  }
}

impl RawForecastItem {
  fn into_entry(self) -> Result<ForecastEntry, FetchError> {
    let condition = self.weather.into_iter().next().unwrap_or_default();
    Ok(ForecastEntry {
      forecast_at:   timestamp(self.dt)?,
      condition:     condition.main,
      description:   condition.description,
      temperature_c: self.main.temp,
      wind_speed_ms: self.wind.speed,
      humidity:      self.main.humidity,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const CURRENT: &str = r#"{
    "coord": { "lon": -0.1257, "lat": 51.5085 },
    "weather": [{ "id": 501, "main": "Rain", "description": "moderate rain", "icon": "10d" }],
    "main": { "temp": 14.2, "feels_like": 13.6, "pressure": 1008, "humidity": 87 },
    "wind": { "speed": 6.17, "deg": 230 },
    "dt": 1717236000,
    "name": "London",
    "cod": 200
  }"#;

  #[test]
  fn current_maps_provider_fields() {
    let raw: RawCurrent = serde_json::from_str(CURRENT).unwrap();
    let snap = raw.into_snapshot().unwrap();

    assert_eq!(snap.city, "London");
    assert_eq!(snap.condition, "Rain");
    assert_eq!(snap.description, "moderate rain");
    assert_eq!(snap.temperature_c, 14.2);
    assert_eq!(snap.wind_speed_ms, 6.17);
    assert_eq!(snap.humidity, 87.0);
    assert_eq!(snap.pressure_hpa, 1008.0);
    assert_eq!(snap.coordinates, Coordinates { lat: 51.5085, lon: -0.1257 });
    assert_eq!(snap.observed_at.timestamp(), 1717236000);
  }

  #[test]
  fn current_tolerates_missing_condition_and_wind() {
    let raw: RawCurrent = serde_json::from_str(
      r#"{ "coord": { "lon": 0, "lat": 0 }, "weather": [],
           "main": { "temp": 20, "humidity": 40 }, "dt": 0, "name": "Null Island" }"#,
    )
    .unwrap();
    let snap = raw.into_snapshot().unwrap();

    assert_eq!(snap.condition, "");
    assert_eq!(snap.wind_speed_ms, 0.0);
  }

  #[test]
  fn forecast_maps_every_step() {
    let raw: RawForecast = serde_json::from_str(
      r#"{ "cod": "200", "list": [
        { "dt": 1717236000, "main": { "temp": 15, "humidity": 80 },
          "weather": [{ "main": "Clouds", "description": "few clouds" }], "wind": { "speed": 3 } },
        { "dt": 1717246800, "main": { "temp": 17, "humidity": 70 },
          "weather": [{ "main": "Clear", "description": "clear sky" }], "wind": { "speed": 2 } }
      ] }"#,
    )
    .unwrap();
    let entries: Vec<ForecastEntry> =
      raw.list.into_iter().map(RawForecastItem::into_entry).collect::<Result<_, _>>().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].condition, "Clear");
    assert_eq!(entries[1].temperature_c, 17.0);
    assert!(entries[0].forecast_at < entries[1].forecast_at);
  }

  #[test]
  fn statuses_classify() {
    assert_eq!(
      classify_status(StatusCode::NOT_FOUND, "Atlantis", r#"{"cod":"404","message":"city not found"}"#),
      FetchError::NotFound("Atlantis".into())
    );
    assert_eq!(classify_status(StatusCode::UNAUTHORIZED, "x", ""), FetchError::Unauthorized);
    assert_eq!(classify_status(StatusCode::TOO_MANY_REQUESTS, "x", ""), FetchError::RateLimited);
    assert_eq!(
      classify_status(StatusCode::BAD_GATEWAY, "x", r#"{"cod":502,"message":"upstream down"}"#),
      FetchError::Upstream { status: Some(502), message: "upstream down".into() }
    );
    assert_eq!(
      classify_status(StatusCode::INTERNAL_SERVER_ERROR, "x", "<html>"),
      FetchError::Upstream { status: Some(500), message: String::new() }
    );
  }

  #[test]
  fn base_url_trailing_slash_is_trimmed() {
    let client = OpenWeatherClient::new(&OpenWeatherSettings {
      api_key:      Some("k".into()),
      base_url:     "http://localhost:9/data/2.5/".into(),
      timeout_secs: 1,
    })
    .unwrap();

    assert_eq!(client.url("weather"), "http://localhost:9/data/2.5/weather");
  }

  #[tokio::test]
  async fn unreachable_host_is_a_network_error() {
    let client = OpenWeatherClient::new(&OpenWeatherSettings {
      api_key:      Some("k".into()),
      base_url:     "http://127.0.0.1:9".into(),
      timeout_secs: 5,
    })
    .unwrap();

    let err = client.current("London").await.unwrap_err();
    assert!(matches!(err, FetchError::NetworkUnavailable(_)), "{err:?}");
  }
}
