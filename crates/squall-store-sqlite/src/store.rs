//! [`SqliteStore`]: the SQLite implementation of [`SubscriberStore`].

use std::{collections::BTreeSet, path::Path};

use chrono::Utc;
use uuid::Uuid;

use squall_core::{
  store::SubscriberStore,
  subscriber::{NewSubscriber, Subscriber},
};

use crate::{
  encode::{RawSubscriber, SUBSCRIBER_COLUMNS, encode_dt, encode_uuid},
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A subscriber store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection handle is shared. All statements
/// run serially on the connection's worker thread, so readers never observe
/// the intermediate state of an upsert transaction.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Every clone of this store becomes
  /// unusable afterwards.
  pub async fn close(&self) -> Result<()> {
    self.conn.clone().close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_subscribers(
    &self,
    sql: String,
    city: Option<String>,
  ) -> Result<Vec<Subscriber>> {
    let raws: Vec<RawSubscriber> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match city {
          Some(c) => stmt
            .query_map(rusqlite::params![c], RawSubscriber::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawSubscriber::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubscriber::into_subscriber).collect()
  }
}

// ─── SubscriberStore impl ────────────────────────────────────────────────────

impl SubscriberStore for SqliteStore {
  type Error = crate::Error;

  async fn upsert(&self, input: NewSubscriber) -> Result<Subscriber> {
    input.validate()?;

    let subscriber = Subscriber {
      subscriber_id: Uuid::new_v4(),
      email:         input.email,
      phone:         input.phone,
      city:          input.city,
      alert_types:   input.alert_types,
      created_at:    Utc::now(),
    };

    let id_str    = encode_uuid(subscriber.subscriber_id);
    let email     = subscriber.email.clone();
    let phone     = subscriber.phone.clone();
    let city      = subscriber.city.clone();
    let tags_str  = subscriber.alert_types.encode()?;
    let at_str    = encode_dt(subscriber.created_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // `x = NULL` is never true, so an absent contact matches nothing.
        tx.execute(
          "DELETE FROM subscribers WHERE email = ?1 OR phone = ?2",
          rusqlite::params![email, phone],
        )?;
        tx.execute(
          "INSERT INTO subscribers (
             subscriber_id, email, phone, city, alert_types, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, email, phone, city, tags_str, at_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(subscriber)
  }

  async fn list_cities(&self) -> Result<BTreeSet<String>> {
    let cities: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT city FROM subscribers
           WHERE city IS NOT NULL AND city != ''",
        )?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(cities.into_iter().collect())
  }

  async fn list_by_city(&self, city: &str) -> Result<Vec<Subscriber>> {
    self
      .query_subscribers(
        format!(
          "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers
           WHERE city = ?1 ORDER BY created_at"
        ),
        Some(city.to_owned()),
      )
      .await
  }

  async fn list_all(&self) -> Result<Vec<Subscriber>> {
    self
      .query_subscribers(
        format!("SELECT {SUBSCRIBER_COLUMNS} FROM subscribers ORDER BY created_at"),
        None,
      )
      .await
  }
}
