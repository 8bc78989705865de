//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use squall_core::FetchError;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Every variant renders as `{"success": false, "error": ..., "type": ...}`,
/// plus a `message` where there is more to say.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation error: {0}")]
  Validation(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("weather fetch failed: {0}")]
  Fetch(#[from] FetchError),

  /// `context` is the client-facing summary; the source stays in the logs.
  #[error("{context}: {source}")]
  Store {
    context: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl From<squall_core::Error> for ApiError {
  fn from(e: squall_core::Error) -> Self {
    match e {
      squall_core::Error::Validation(m) => ApiError::Validation(m),
      other => ApiError::Store { context: "Internal server error", source: Box::new(other) },
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::Validation(rejection.body_text()) }
}

impl ApiError {
  fn parts(&self) -> (StatusCode, &'static str, String, Option<String>) {
    match self {
      ApiError::Validation(m) => {
        (StatusCode::BAD_REQUEST, "validation_error", m.clone(), None)
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.clone(), None),
      ApiError::Configuration(m) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "configuration_error",
        "API key not configured".to_owned(),
        Some(m.clone()),
      ),
      ApiError::Fetch(e) => fetch_parts(e),
      ApiError::Store { context, .. } => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "server_error",
        (*context).to_owned(),
        None,
      ),
    }
  }
}

fn fetch_parts(e: &FetchError) -> (StatusCode, &'static str, String, Option<String>) {
  let (status, error, message) = match e {
    FetchError::NotFound(_) => (
      StatusCode::NOT_FOUND,
      "City not found",
      "Please check the city name and try again".to_owned(),
    ),
    FetchError::Unauthorized => (
      StatusCode::INTERNAL_SERVER_ERROR,
      "API key invalid",
      "The weather provider API key is invalid. Please check your API key.".to_owned(),
    ),
    FetchError::RateLimited => (
      StatusCode::TOO_MANY_REQUESTS,
      "Rate limit exceeded",
      "Too many requests. Please try again later".to_owned(),
    ),
    FetchError::Timeout => (
      StatusCode::REQUEST_TIMEOUT,
      "Request timeout",
      "Weather service is taking too long to respond".to_owned(),
    ),
    FetchError::NetworkUnavailable(_) => (
      StatusCode::SERVICE_UNAVAILABLE,
      "Network error",
      "Unable to connect to weather service".to_owned(),
    ),
    FetchError::Upstream { status, message } => (
      status
        .and_then(|s| StatusCode::from_u16(s).ok())
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY),
      "Weather service error",
      if message.is_empty() {
        "Unable to fetch weather data".to_owned()
      } else {
        message.clone()
      },
    ),
  };
  (status, e.kind(), error.to_owned(), Some(message))
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, kind, error, message) = self.parts();
    let mut body = json!({ "success": false, "error": error, "type": kind });
    if let Some(message) = message {
      body["message"] = json!(message);
    }
    (status, Json(body)).into_response()
  }
}
