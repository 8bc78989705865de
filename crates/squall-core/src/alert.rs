//! Alert vocabulary: the type tags shared by rules and subscriber
//! preferences, and the conditions produced when a rule triggers.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator as _};

use crate::Result;

// ─── AlertType ───────────────────────────────────────────────────────────────

/// The controlled vocabulary of alert categories.
///
/// The string form (`"rain"`, `"heat"`, `"wind"`) is what subscribers store
/// in their preference list.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum AlertType {
  Rain,
  Heat,
  Wind,
}

impl AlertType {
  pub fn as_str(&self) -> &str { self.as_ref() }
}

// ─── AlertCondition ──────────────────────────────────────────────────────────

/// A triggered rule. Produced per evaluation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCondition {
  #[serde(rename = "type")]
  pub kind:        AlertType,
  pub title:       String,
  pub description: String,
}

// ─── AlertTypes ──────────────────────────────────────────────────────────────

/// A subscriber's ordered set of alert-type tags.
///
/// Tags are kept as free strings: a tag outside the [`AlertType`] vocabulary
/// is stored and returned verbatim but never matches a condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AlertTypes(Vec<String>);

impl AlertTypes {
  /// Build a tag set, dropping blank entries and repeated tags while keeping
  /// first-seen order.
  pub fn new<I, T>(tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
      let tag = tag.into();
      if tag.trim().is_empty() || out.contains(&tag) {
        continue;
      }
      out.push(tag);
    }
    Self(out)
  }

  /// Every known alert type; the default preference for new subscribers.
  pub fn all() -> Self { Self::new(AlertType::iter().map(|t| t.to_string())) }

  pub fn includes(&self, kind: AlertType) -> bool {
    self.0.iter().any(|t| t == kind.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Encode for the `alert_types` text column: a compact JSON array.
  pub fn encode(&self) -> Result<String> { Ok(serde_json::to_string(&self.0)?) }

  /// Decode a column value produced by [`AlertTypes::encode`].
  ///
  /// A blank or `NULL`-equivalent value decodes to the empty set.
  pub fn decode(s: &str) -> Result<Self> {
    if s.trim().is_empty() {
      return Ok(Self::default());
    }
    let tags: Vec<String> = serde_json::from_str(s)?;
    Ok(Self::new(tags))
  }
}

impl From<Vec<String>> for AlertTypes {
  fn from(tags: Vec<String>) -> Self { Self::new(tags) }
}

impl From<AlertTypes> for Vec<String> {
  fn from(tags: AlertTypes) -> Self { tags.0 }
}
