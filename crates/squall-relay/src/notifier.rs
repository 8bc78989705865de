//! [`Notifier`]: one-shot delivery of a single alert to a single subscriber.

use std::time::Duration;

use chrono::Utc;
use squall_core::{
  alert::AlertCondition,
  channel::NotificationChannel,
  subscriber::Subscriber,
  weather::WeatherSnapshot,
};
use tracing::{info, warn};

use crate::{DeliveryFailure, Result, message::MessageRenderer};

/// Recommended upper bound on a single channel call.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers alerts through a [`NotificationChannel`].
///
/// Each call to [`Notifier::send`] makes at most one channel attempt, bounded
/// by the configured timeout. There is no retry; a failure is logged and
/// returned to the caller as a [`DeliveryFailure`].
pub struct Notifier<C> {
  channel:  C,
  renderer: MessageRenderer,
  timeout:  Duration,
}

impl<C: NotificationChannel> Notifier<C> {
  pub fn new(channel: C, timeout: Duration) -> Result<Self> {
    Ok(Self { channel, renderer: MessageRenderer::new()?, timeout })
  }

  pub fn channel(&self) -> &C { &self.channel }

  pub async fn send(
    &self,
    subscriber: &Subscriber,
    snapshot: &WeatherSnapshot,
    condition: &AlertCondition,
  ) -> Result<(), DeliveryFailure> {
    let outcome = self.attempt(subscriber, snapshot, condition).await;
    match &outcome {
      Ok(()) => info!(
        subscriber_id = %subscriber.subscriber_id,
        city = %snapshot.city,
        alert = %condition.kind,
        "alert delivered"
      ),
      Err(failure) => warn!(
        subscriber_id = %subscriber.subscriber_id,
        city = %snapshot.city,
        alert = %condition.kind,
        error = %failure,
        "alert delivery failed"
      ),
    }
    outcome
  }

  async fn attempt(
    &self,
    subscriber: &Subscriber,
    snapshot: &WeatherSnapshot,
    condition: &AlertCondition,
  ) -> Result<(), DeliveryFailure> {
    let recipient = subscriber
      .email_address()
      .ok_or(DeliveryFailure::NoAddress(subscriber.subscriber_id))?;

    let message = self
      .renderer
      .render(recipient, snapshot, condition, Utc::now())
      .map_err(|e| DeliveryFailure::Render {
        recipient: recipient.to_owned(),
        reason:    e.to_string(),
      })?;

    match tokio::time::timeout(self.timeout, self.channel.deliver(message)).await {
      Ok(Ok(())) => Ok(()),
      Ok(Err(e)) => Err(DeliveryFailure::Channel {
        recipient: recipient.to_owned(),
        reason:    e.to_string(),
      }),
      Err(_) => Err(DeliveryFailure::TimedOut {
        recipient: recipient.to_owned(),
        timeout:   self.timeout,
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{RecordingChannel, snapshot, subscriber};
  use squall_core::rules::RuleEngine;

  fn rain_condition() -> AlertCondition {
    RuleEngine::default()
      .evaluate(&snapshot("Paris", "Rain", 18.0, 0.0))
      .remove(0)
  }

  #[tokio::test]
  async fn delivers_one_message() {
    let notifier = Notifier::new(RecordingChannel::default(), DEFAULT_DELIVERY_TIMEOUT).unwrap();
    let sub = subscriber(Some("a@x.com"), "Paris", &["rain"]);

    notifier
      .send(&sub, &snapshot("Paris", "Rain", 18.0, 0.0), &rain_condition())
      .await
      .unwrap();

    let sent = notifier.channel().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "a@x.com");
    assert_eq!(sent[0].subject, "Weather Alert: Rain Alert");
  }

  #[tokio::test]
  async fn missing_address_is_a_failure_not_a_panic() {
    let notifier = Notifier::new(RecordingChannel::default(), DEFAULT_DELIVERY_TIMEOUT).unwrap();
    let sub = subscriber(None, "Paris", &["rain"]);

    let err = notifier
      .send(&sub, &snapshot("Paris", "Rain", 18.0, 0.0), &rain_condition())
      .await
      .unwrap_err();

    assert_eq!(err, DeliveryFailure::NoAddress(sub.subscriber_id));
    assert!(notifier.channel().sent().is_empty());
  }

  #[tokio::test]
  async fn channel_error_is_reported() {
    let channel = RecordingChannel::failing_for(["bad@x.com"]);
    let notifier = Notifier::new(channel, DEFAULT_DELIVERY_TIMEOUT).unwrap();
    let sub = subscriber(Some("bad@x.com"), "Paris", &["rain"]);

    let err = notifier
      .send(&sub, &snapshot("Paris", "Rain", 18.0, 0.0), &rain_condition())
      .await
      .unwrap_err();

    assert!(matches!(err, DeliveryFailure::Channel { ref recipient, .. } if recipient == "bad@x.com"));
  }

  #[tokio::test]
  async fn slow_channel_times_out() {
    let channel = RecordingChannel::with_delay(Duration::from_millis(500));
    let notifier = Notifier::new(channel, Duration::from_millis(20)).unwrap();
    let sub = subscriber(Some("slow@x.com"), "Paris", &["rain"]);

    let err = notifier
      .send(&sub, &snapshot("Paris", "Rain", 18.0, 0.0), &rain_condition())
      .await
      .unwrap_err();

    assert!(matches!(err, DeliveryFailure::TimedOut { .. }));
    assert!(notifier.channel().sent().is_empty());
  }
}
