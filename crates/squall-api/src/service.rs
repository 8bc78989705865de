//! Service metadata endpoints: `/`, `/api/health`, and the 404 fallback.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use squall_core::{
  channel::NotificationChannel,
  store::SubscriberStore,
  weather::WeatherProvider,
};

use crate::{AppState, error::ApiError};

/// Static facts about the running process, reported by the info endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
  pub service:            String,
  pub version:            String,
  pub environment:        String,
  pub port:               u16,
  pub api_key_configured: bool,
  pub email_configured:   bool,
}

/// `GET /`
pub async fn root<S, W, C>(State(state): State<AppState<S, W, C>>) -> Json<Value>
where
  S: SubscriberStore,
  W: WeatherProvider,
  C: NotificationChannel,
{
  let info = &state.info;
  Json(json!({
    "message":          "Backend running",
    "service":          info.service,
    "version":          info.version,
    "timestamp":        Utc::now(),
    "environment":      info.environment,
    "port":             info.port,
    "apiKeyConfigured": info.api_key_configured,
  }))
}

/// `GET /api/health`
pub async fn health<S, W, C>(State(state): State<AppState<S, W, C>>) -> Json<Value>
where
  S: SubscriberStore,
  W: WeatherProvider,
  C: NotificationChannel,
{
  let info = &state.info;
  Json(json!({
    "success":          true,
    "message":          format!("{} is running", info.service),
    "timestamp":        Utc::now(),
    "environment":      info.environment,
    "port":             info.port,
    "apiKeyConfigured": info.api_key_configured,
    "features": {
      "weather":  true,
      "alerts":   true,
      "email":    info.email_configured,
      "database": true,
    },
  }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError { ApiError::NotFound("Endpoint not found".to_owned()) }
