//! JSON HTTP surface for the squall weather-alert relay.
//!
//! Exposes an axum [`Router`] backed by any [`SubscriberStore`],
//! [`WeatherProvider`] and [`NotificationChannel`]. TLS and transport
//! concerns are the caller's responsibility; there is no authentication.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Service info |
//! | `GET`  | `/api/health` | Service info plus feature flags |
//! | `GET`  | `/api/weather/{city}` | Current conditions and 5-day forecast |
//! | `POST` | `/api/subscribe` | Body: `{email?, phone?, city, alertTypes?}` |
//! | `GET`  | `/api/subscribers` | Every subscriber, unredacted |

pub mod error;
pub mod service;
pub mod subscribers;
pub mod weather;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use squall_core::{
  channel::NotificationChannel,
  store::SubscriberStore,
  weather::WeatherProvider,
};
use squall_relay::Orchestrator;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;
pub use service::ServiceInfo;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. Built once at startup.
pub struct AppState<S, W, C> {
  pub store:        Arc<S>,
  pub weather:      Arc<W>,
  pub orchestrator: Arc<Orchestrator<S, C>>,
  pub info:         Arc<ServiceInfo>,
}

impl<S, W, C> Clone for AppState<S, W, C> {
  fn clone(&self) -> Self {
    Self {
      store:        Arc::clone(&self.store),
      weather:      Arc::clone(&self.weather),
      orchestrator: Arc::clone(&self.orchestrator),
      info:         Arc::clone(&self.info),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full HTTP router, including permissive CORS and request tracing.
pub fn router<S, W, C>(state: AppState<S, W, C>) -> Router
where
  S: SubscriberStore + 'static,
  W: WeatherProvider + 'static,
  C: NotificationChannel + 'static,
{
  Router::new()
    .route("/", get(service::root::<S, W, C>))
    .route("/api/health", get(service::health::<S, W, C>))
    .route("/api/weather/{city}", get(weather::lookup::<S, W, C>))
    .route("/api/subscribe", post(subscribers::subscribe::<S, W, C>))
    .route("/api/subscribers", get(subscribers::list::<S, W, C>))
    .fallback(service::not_found)
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
