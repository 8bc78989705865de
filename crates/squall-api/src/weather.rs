//! `GET /api/weather/{city}`: current conditions plus a daily forecast.
//!
//! A successful lookup also feeds the current snapshot to the alert pipeline
//! in the background; the response does not wait for it.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use serde_json::{Value, json};
use squall_core::{
  channel::NotificationChannel,
  store::SubscriberStore,
  weather::{WeatherProvider, daily_forecast},
};
use tracing::{info, warn};

use crate::{AppState, error::ApiError};

/// Number of days kept from the provider's step-wise forecast.
pub const FORECAST_DAYS: usize = 5;

pub async fn lookup<S, W, C>(
  State(state): State<AppState<S, W, C>>,
  Path(city): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: SubscriberStore + 'static,
  W: WeatherProvider + 'static,
  C: NotificationChannel + 'static,
{
  let city = city.trim();
  if city.is_empty() {
    return Err(ApiError::Validation("City name is required".to_owned()));
  }
  if !state.info.api_key_configured {
    return Err(ApiError::Configuration(
      "The weather provider API key is not set.".to_owned(),
    ));
  }

  info!(%city, "fetching weather");
  let current = state.weather.current(city).await?;
  let forecast = daily_forecast(state.weather.forecast(city).await?, FORECAST_DAYS);

  let orchestrator = Arc::clone(&state.orchestrator);
  let snapshot = current.clone();
  tokio::spawn(async move {
    if let Err(e) = orchestrator.process_snapshot(&snapshot).await {
      warn!(city = %snapshot.city, error = %e, "background alert processing failed");
    }
  });

  Ok(Json(json!({
    "success": true,
    "data": {
      "current":  current,
      "forecast": forecast,
    },
  })))
}
