//! Error types for `squall-relay`.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("template error: {0}")]
  Template(#[from] Box<handlebars::TemplateError>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a single notification was not delivered. Recorded and logged against
/// the recipient; never aborts sibling deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFailure {
  #[error("subscriber {0} has no email address")]
  NoAddress(Uuid),

  #[error("failed to render message for {recipient}: {reason}")]
  Render {
    recipient: String,
    reason:    String,
  },

  #[error("delivery to {recipient} failed: {reason}")]
  Channel {
    recipient: String,
    reason:    String,
  },

  #[error("delivery to {recipient} timed out after {timeout:?}")]
  TimedOut {
    recipient: String,
    timeout:   Duration,
  },
}
