//! Error types for `squall-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Bad input to a subscribe request: missing contact or city.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure modes of a weather-provider lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  #[error("city not found: {0}")]
  NotFound(String),

  #[error("weather provider rejected the API key")]
  Unauthorized,

  #[error("weather provider rate limit exceeded")]
  RateLimited,

  #[error("weather provider timed out")]
  Timeout,

  #[error("weather provider unreachable: {0}")]
  NetworkUnavailable(String),

  #[error("weather provider error ({}): {message}", status.map_or_else(|| "no status".to_string(), |s| s.to_string()))]
  Upstream {
    status:  Option<u16>,
    message: String,
  },
}

impl FetchError {
  /// Stable machine-readable category, surfaced as the `type` field of API
  /// error bodies.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::NotFound(_) => "city_not_found",
      Self::Unauthorized | Self::Upstream { .. } => "api_error",
      Self::RateLimited => "rate_limit",
      Self::Timeout => "timeout",
      Self::NetworkUnavailable(_) => "network_error",
    }
  }
}
