//! [`SmtpChannel`]: email delivery over an SMTP relay via `lettre`.

use lettre::{
  AsyncSmtpTransport,
  AsyncTransport as _,
  Message,
  Tokio1Executor,
  message::{Mailbox, header::ContentType},
  transport::smtp::authentication::Credentials,
};
use squall_core::channel::{NotificationChannel, OutboundMessage};
use thiserror::Error;

use crate::settings::SmtpSettings;

#[derive(Debug, Error)]
pub enum MailError {
  #[error("email transport not configured")]
  NotConfigured,

  #[error("invalid address {address:?}: {source}")]
  Address {
    address: String,
    #[source]
    source:  lettre::address::AddressError,
  },

  #[error("failed to build message: {0}")]
  Build(#[from] lettre::error::Error),

  #[error("smtp error: {0}")]
  Smtp(#[from] lettre::transport::smtp::Error),
}

struct Relay {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from:      Mailbox,
}

/// HTML email channel. When built without SMTP settings every delivery fails
/// with [`MailError::NotConfigured`], which the notifier records per recipient.
pub struct SmtpChannel {
  relay: Option<Relay>,
}

impl SmtpChannel {
  /// Build the transport. No connection is made until the first delivery.
  pub fn new(settings: Option<&SmtpSettings>) -> Result<Self, MailError> {
    let Some(settings) = settings else {
      return Ok(Self::disabled());
    };

    let from = parse_mailbox(&settings.from)?;
    let mut builder = if settings.starttls {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
    }
    .port(settings.port);

    if let Some(username) = &settings.username {
      builder = builder.credentials(Credentials::new(
        username.clone(),
        settings.password.clone().unwrap_or_default(),
      ));
    }

    Ok(Self { relay: Some(Relay { transport: builder.build(), from }) })
  }

  pub fn disabled() -> Self { Self { relay: None } }

  pub fn is_configured(&self) -> bool { self.relay.is_some() }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
  address
    .parse()
    .map_err(|source| MailError::Address { address: address.to_string(), source })
}

impl NotificationChannel for SmtpChannel {
  type Error = MailError;

  async fn deliver(&self, message: OutboundMessage) -> Result<(), MailError> {
    let Some(relay) = &self.relay else {
      return Err(MailError::NotConfigured);
    };

    let email = Message::builder()
      .from(relay.from.clone())
      .to(parse_mailbox(&message.recipient)?)
      .subject(message.subject)
      .header(ContentType::TEXT_HTML)
      .body(message.body)?;

    relay.transport.send(email).await?;
    Ok(())
  }
}
