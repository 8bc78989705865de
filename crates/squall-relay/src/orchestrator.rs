//! [`Orchestrator`]: turns one weather snapshot into notifications.

use std::sync::Arc;

use squall_core::{
  alert::AlertType,
  channel::NotificationChannel,
  rules::RuleEngine,
  store::SubscriberStore,
  weather::WeatherSnapshot,
};
use tracing::{debug, info};

use crate::{DeliveryFailure, Notifier};

/// What a single [`Orchestrator::process_snapshot`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
  /// Triggered alert types, in rule order.
  pub triggered:   Vec<AlertType>,
  /// Subscribers registered for the snapshot's city.
  pub subscribers: usize,
  pub attempted:   usize,
  pub delivered:   usize,
  pub failures:    Vec<DeliveryFailure>,
}

/// Stateless pipeline: rules, then subscriber lookup, then fan-out delivery.
///
/// No memory is kept between calls; a condition that stays true is notified
/// again on every snapshot.
pub struct Orchestrator<S, C> {
  store:    Arc<S>,
  engine:   RuleEngine,
  notifier: Notifier<C>,
}

impl<S, C> Orchestrator<S, C>
where
  S: SubscriberStore,
  C: NotificationChannel,
{
  pub fn new(store: Arc<S>, engine: RuleEngine, notifier: Notifier<C>) -> Self {
    Self { store, engine, notifier }
  }

  pub fn notifier(&self) -> &Notifier<C> { &self.notifier }

  /// Evaluate `snapshot` and notify every subscriber of its city once per
  /// triggered condition they opted into.
  ///
  /// The store is not consulted when no rule triggers. A store failure is
  /// returned; delivery failures are collected in the report.
  pub async fn process_snapshot(
    &self,
    snapshot: &WeatherSnapshot,
  ) -> Result<DispatchReport, S::Error> {
    let conditions = self.engine.evaluate(snapshot);
    if conditions.is_empty() {
      debug!(city = %snapshot.city, "no alert conditions triggered");
      return Ok(DispatchReport::default());
    }

    let mut report = DispatchReport {
      triggered: conditions.iter().map(|c| c.kind).collect(),
      ..DispatchReport::default()
    };

    let subscribers = self.store.list_by_city(&snapshot.city).await?;
    report.subscribers = subscribers.len();
    if subscribers.is_empty() {
      debug!(city = %snapshot.city, "no subscribers for city");
      return Ok(report);
    }

    for subscriber in &subscribers {
      if subscriber.email_address().is_none() {
        debug!(subscriber_id = %subscriber.subscriber_id, "no deliverable contact; skipping");
        continue;
      }
      for condition in &conditions {
        if !subscriber.alert_types.includes(condition.kind) {
          continue;
        }
        report.attempted += 1;
        match self.notifier.send(subscriber, snapshot, condition).await {
          Ok(()) => report.delivered += 1,
          Err(failure) => report.failures.push(failure),
        }
      }
    }

    info!(
      city = %snapshot.city,
      triggered = ?report.triggered,
      attempted = report.attempted,
      delivered = report.delivered,
      failed = report.failures.len(),
      "processed weather snapshot"
    );
    Ok(report)
  }
}
