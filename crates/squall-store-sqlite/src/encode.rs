//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! alert-type tags a compact JSON array (see [`AlertTypes::encode`]).

use chrono::{DateTime, Utc};
use squall_core::{alert::AlertTypes, subscriber::Subscriber};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` that builds a [`RawSubscriber`].
pub const SUBSCRIBER_COLUMNS: &str =
  "subscriber_id, email, phone, city, alert_types, created_at";

/// Raw strings read directly from a `subscribers` row.
pub struct RawSubscriber {
  pub subscriber_id: String,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub city:          String,
  pub alert_types:   Option<String>,
  pub created_at:    String,
}

impl RawSubscriber {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subscriber_id: row.get(0)?,
      email:         row.get(1)?,
      phone:         row.get(2)?,
      city:          row.get(3)?,
      alert_types:   row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_subscriber(self) -> Result<Subscriber> {
    Ok(Subscriber {
      subscriber_id: decode_uuid(&self.subscriber_id)?,
      email:         self.email,
      phone:         self.phone,
      city:          self.city,
      alert_types:   AlertTypes::decode(self.alert_types.as_deref().unwrap_or_default())?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
