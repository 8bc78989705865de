//! Outbound notification channel abstraction (e.g. SMTP email).

use std::future::Future;

use serde::{Deserialize, Serialize};

/// A fully rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
  pub recipient: String,
  pub subject:   String,
  /// HTML body.
  pub body:      String,
}

/// A transport that attempts exactly one delivery per call.
///
/// Every error is treated the same way by callers: logged against the
/// recipient and never propagated.
pub trait NotificationChannel: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn deliver(
    &self,
    message: OutboundMessage,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
