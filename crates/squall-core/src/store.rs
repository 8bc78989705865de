//! The `SubscriberStore` trait.
//!
//! Implemented by storage backends (e.g. `squall-store-sqlite`). The relay and
//! the HTTP surface depend on this abstraction, not on any concrete backend.

use std::{collections::BTreeSet, future::Future};

use crate::subscriber::{NewSubscriber, Subscriber};

/// Abstraction over the subscriber table.
///
/// The store is the single owner of subscriber records; [`upsert`] is the only
/// write path. Implementations must allow reads to proceed concurrently with
/// an in-flight upsert without observing a half-replaced record.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
///
/// [`upsert`]: SubscriberStore::upsert
pub trait SubscriberStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a subscriber, replacing any record that shares its email or its
  /// phone number. Fails without writing when the input has no contact
  /// method or no city.
  fn upsert(
    &self,
    input: NewSubscriber,
  ) -> impl Future<Output = Result<Subscriber, Self::Error>> + Send + '_;

  /// Every distinct non-empty city with at least one subscriber.
  fn list_cities(
    &self,
  ) -> impl Future<Output = Result<BTreeSet<String>, Self::Error>> + Send + '_;

  /// Subscribers whose city equals `city` exactly (case-sensitive). Empty when
  /// nobody matches.
  fn list_by_city<'a>(
    &'a self,
    city: &'a str,
  ) -> impl Future<Output = Result<Vec<Subscriber>, Self::Error>> + Send + 'a;

  /// Every subscriber, unfiltered.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Subscriber>, Self::Error>> + Send + '_;
}
