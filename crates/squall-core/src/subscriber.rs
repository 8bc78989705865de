//! Subscriber: a contact identity bound to one city and a set of alert
//! preferences.
//!
//! At most one subscriber exists per email address and, independently, per
//! phone number. Re-subscribing with a known contact replaces the old record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, alert::AlertTypes};

/// A persisted subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
  pub subscriber_id: Uuid,
  pub email:         Option<String>,
  /// Stored for future SMS delivery; never used to deliver today.
  pub phone:         Option<String>,
  /// Matched case-sensitively against the provider's canonical city name.
  pub city:          String,
  pub alert_types:   AlertTypes,
  pub created_at:    DateTime<Utc>,
}

impl Subscriber {
  /// The address a notification can be delivered to, if any.
  pub fn email_address(&self) -> Option<&str> {
    self.email.as_deref().filter(|e| !e.trim().is_empty())
  }
}

/// Input to [`crate::store::SubscriberStore::upsert`].
/// `subscriber_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub city:        String,
  pub alert_types: AlertTypes,
}

impl NewSubscriber {
  /// Build an input, treating blank contact fields as absent and defaulting
  /// the preference set to every known alert type.
  pub fn new(
    email: Option<String>,
    phone: Option<String>,
    city: impl Into<String>,
    alert_types: Option<AlertTypes>,
  ) -> Self {
    Self {
      email:       non_blank(email),
      phone:       non_blank(phone),
      city:        city.into().trim().to_owned(),
      alert_types: alert_types.unwrap_or_else(AlertTypes::all),
    }
  }

  /// Reject inputs without a contact method or without a city.
  pub fn validate(&self) -> Result<()> {
    if self.email.is_none() && self.phone.is_none() {
      return Err(Error::Validation(
        "Email or phone number is required".to_owned(),
      ));
    }
    if self.city.is_empty() {
      return Err(Error::Validation("City is required".to_owned()));
    }
    Ok(())
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}
