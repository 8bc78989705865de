//! Test doubles for the core traits.

use std::{
  collections::{BTreeSet, HashMap},
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use chrono::Utc;
use squall_core::{
  FetchError,
  alert::AlertTypes,
  channel::{NotificationChannel, OutboundMessage},
  store::SubscriberStore,
  subscriber::Subscriber,
  weather::{Coordinates, ForecastEntry, WeatherProvider, WeatherSnapshot},
};
use thiserror::Error;
use uuid::Uuid;

pub fn snapshot(city: &str, condition: &str, temperature_c: f64, wind_speed_ms: f64) -> WeatherSnapshot {
  WeatherSnapshot {
    city: city.into(),
    condition: condition.into(),
    description: condition.to_lowercase(),
    temperature_c,
    wind_speed_ms,
    humidity: 70.0,
    pressure_hpa: 1009.0,
    coordinates: Coordinates { lat: 48.85, lon: 2.35 },
    observed_at: Utc::now(),
  }
}

pub fn subscriber(email: Option<&str>, city: &str, tags: &[&str]) -> Subscriber {
  Subscriber {
    subscriber_id: Uuid::new_v4(),
    email:         email.map(str::to_owned),
    phone:         email.is_none().then(|| "+10000000000".to_owned()),
    city:          city.into(),
    alert_types:   AlertTypes::new(tags.iter().copied()),
    created_at:    Utc::now(),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("store unavailable")]
pub struct StoreDown;

/// Read-only store over a fixed list that counts lookups.
#[derive(Default)]
pub struct MemoryStore {
  subscribers:      Vec<Subscriber>,
  fail_city:        Option<String>,
  pub city_lookups: AtomicUsize,
}

impl MemoryStore {
  pub fn new(subscribers: Vec<Subscriber>) -> Self {
    Self { subscribers, ..Self::default() }
  }

  pub fn failing_for(mut self, city: &str) -> Self {
    self.fail_city = Some(city.to_owned());
    self
  }
}

impl SubscriberStore for MemoryStore {
  type Error = StoreDown;

  async fn upsert(
    &self,
    _input: squall_core::subscriber::NewSubscriber,
  ) -> Result<Subscriber, StoreDown> {
    Err(StoreDown)
  }

  async fn list_cities(&self) -> Result<BTreeSet<String>, StoreDown> {
    Ok(self.subscribers.iter().map(|s| s.city.clone()).collect())
  }

  async fn list_by_city(&self, city: &str) -> Result<Vec<Subscriber>, StoreDown> {
    self.city_lookups.fetch_add(1, Ordering::SeqCst);
    if self.fail_city.as_deref() == Some(city) {
      return Err(StoreDown);
    }
    Ok(self.subscribers.iter().filter(|s| s.city == city).cloned().collect())
  }

  async fn list_all(&self) -> Result<Vec<Subscriber>, StoreDown> {
    Ok(self.subscribers.clone())
  }
}

// ─── Channel ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("mailbox rejected {0}")]
pub struct Rejected(String);

/// Records every delivered message; can reject chosen recipients or stall.
#[derive(Default)]
pub struct RecordingChannel {
  sent:    Mutex<Vec<OutboundMessage>>,
  reject:  Vec<String>,
  delay:   Option<Duration>,
}

impl RecordingChannel {
  pub fn failing_for<const N: usize>(recipients: [&str; N]) -> Self {
    Self { reject: recipients.iter().map(|r| r.to_string()).collect(), ..Self::default() }
  }

  pub fn with_delay(delay: Duration) -> Self { Self { delay: Some(delay), ..Self::default() } }

  pub fn sent(&self) -> Vec<OutboundMessage> { self.sent.lock().unwrap().clone() }
}

impl NotificationChannel for RecordingChannel {
  type Error = Rejected;

  async fn deliver(&self, message: OutboundMessage) -> Result<(), Rejected> {
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    if self.reject.contains(&message.recipient) {
      return Err(Rejected(message.recipient));
    }
    self.sent.lock().unwrap().push(message);
    Ok(())
  }
}

// ─── Provider ────────────────────────────────────────────────────────────────

/// Answers from a fixed table keyed by city; unknown cities are `NotFound`.
#[derive(Default)]
pub struct ScriptedProvider {
  answers: HashMap<String, Result<WeatherSnapshot, FetchError>>,
  calls:   Mutex<Vec<String>>,
}

impl ScriptedProvider {
  pub fn returning(mut self, snapshot: WeatherSnapshot) -> Self {
    self.answers.insert(snapshot.city.clone(), Ok(snapshot));
    self
  }

  pub fn failing(mut self, city: &str, error: FetchError) -> Self {
    self.answers.insert(city.to_owned(), Err(error));
    self
  }

  pub fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }
}

impl WeatherProvider for ScriptedProvider {
  async fn current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
    self.calls.lock().unwrap().push(city.to_owned());
    self
      .answers
      .get(city)
      .cloned()
      .unwrap_or_else(|| Err(FetchError::NotFound(city.to_owned())))
  }

  async fn forecast(&self, _city: &str) -> Result<Vec<ForecastEntry>, FetchError> {
    Ok(Vec::new())
  }
}
