//! Handlers for subscription endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/subscribe` | Body: [`SubscribeBody`]; upserts by email/phone |
//! | `GET`  | `/api/subscribers` | Administrative dump, no redaction |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use squall_core::{
  alert::AlertTypes,
  channel::NotificationChannel,
  store::SubscriberStore,
  subscriber::NewSubscriber,
  weather::WeatherProvider,
};
use tracing::{error, info};

use crate::{AppState, error::ApiError};

// ─── Subscribe ────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /api/subscribe`.
///
/// `city` is optional at the parsing layer so that a missing city produces the
/// same validation response as a blank one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeBody {
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub city:        Option<String>,
  /// Defaults to every known alert type when omitted.
  pub alert_types: Option<Vec<String>>,
}

impl From<SubscribeBody> for NewSubscriber {
  fn from(b: SubscribeBody) -> Self {
    NewSubscriber::new(
      b.email,
      b.phone,
      b.city.unwrap_or_default(),
      b.alert_types.map(AlertTypes::from),
    )
  }
}

/// `POST /api/subscribe`
pub async fn subscribe<S, W, C>(
  State(state): State<AppState<S, W, C>>,
  body: Result<Json<SubscribeBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: SubscriberStore,
  W: WeatherProvider,
  C: NotificationChannel,
{
  let Json(body) = body?;
  let input = NewSubscriber::from(body);
  input.validate()?;

  let subscriber = state.store.upsert(input).await.map_err(|e| {
    error!(error = %e, "subscription failed");
    ApiError::Store { context: "Failed to subscribe to alerts", source: Box::new(e) }
  })?;

  info!(
    subscriber_id = %subscriber.subscriber_id,
    city = %subscriber.city,
    "subscriber registered"
  );

  Ok(Json(json!({
    "success": true,
    "message": "Successfully subscribed to weather alerts",
    "id":      subscriber.subscriber_id,
  })))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/subscribers`
pub async fn list<S, W, C>(
  State(state): State<AppState<S, W, C>>,
) -> Result<Json<Value>, ApiError>
where
  S: SubscriberStore,
  W: WeatherProvider,
  C: NotificationChannel,
{
  let subscribers = state.store.list_all().await.map_err(|e| {
    error!(error = %e, "listing subscribers failed");
    ApiError::Store { context: "Failed to get subscribers", source: Box::new(e) }
  })?;

  Ok(Json(json!({ "success": true, "data": subscribers })))
}
