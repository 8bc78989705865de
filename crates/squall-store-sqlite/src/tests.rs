//! Integration tests for `SqliteStore` against an in-memory database.

use squall_core::{
  alert::{AlertType, AlertTypes},
  store::SubscriberStore,
  subscriber::NewSubscriber,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn by_email(email: &str, city: &str) -> NewSubscriber {
  NewSubscriber::new(Some(email.into()), None, city, None)
}

fn by_phone(phone: &str, city: &str) -> NewSubscriber {
  NewSubscriber::new(None, Some(phone.into()), city, None)
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_and_list_all() {
  let s = store().await;

  let sub = s.upsert(by_email("a@x.com", "Paris")).await.unwrap();
  assert_eq!(sub.email.as_deref(), Some("a@x.com"));
  assert_eq!(sub.alert_types, AlertTypes::all());

  let all = s.list_all().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0], sub);
}

#[tokio::test]
async fn same_email_replaces_previous_record() {
  let s = store().await;

  let first = s.upsert(by_email("a@x.com", "Paris")).await.unwrap();
  let second = s.upsert(by_email("a@x.com", "Lyon")).await.unwrap();
  assert_ne!(first.subscriber_id, second.subscriber_id);

  let all = s.list_all().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].city, "Lyon");

  assert!(s.list_by_city("Paris").await.unwrap().is_empty());
  let lyon = s.list_by_city("Lyon").await.unwrap();
  assert_eq!(lyon.len(), 1);
  assert_eq!(lyon[0].subscriber_id, second.subscriber_id);
}

#[tokio::test]
async fn replacement_does_not_merge_preferences() {
  let s = store().await;

  let mut input = by_email("a@x.com", "Paris");
  input.alert_types = AlertTypes::new(["rain", "heat"]);
  s.upsert(input).await.unwrap();

  let mut input = by_email("a@x.com", "Paris");
  input.alert_types = AlertTypes::new(["wind"]);
  s.upsert(input).await.unwrap();

  let all = s.list_all().await.unwrap();
  assert_eq!(all.len(), 1);
  assert!(all[0].alert_types.includes(AlertType::Wind));
  assert!(!all[0].alert_types.includes(AlertType::Rain));
}

#[tokio::test]
async fn same_phone_replaces_previous_record() {
  let s = store().await;

  s.upsert(by_phone("+3312345", "Paris")).await.unwrap();
  s.upsert(by_phone("+3312345", "Nice")).await.unwrap();

  let all = s.list_all().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].city, "Nice");
}

#[tokio::test]
async fn upsert_replaces_both_email_and_phone_matches() {
  let s = store().await;

  s.upsert(by_email("a@x.com", "Paris")).await.unwrap();
  s.upsert(by_phone("+3312345", "Lyon")).await.unwrap();
  s.upsert(by_email("b@x.com", "Nice")).await.unwrap();

  let both = NewSubscriber::new(
    Some("a@x.com".into()),
    Some("+3312345".into()),
    "Rome",
    None,
  );
  s.upsert(both).await.unwrap();

  let all = s.list_all().await.unwrap();
  assert_eq!(all.len(), 2);
  let rome: Vec<_> = all.iter().filter(|s| s.city == "Rome").collect();
  assert_eq!(rome.len(), 1);
  assert_eq!(rome[0].phone.as_deref(), Some("+3312345"));
  assert!(all.iter().any(|s| s.email.as_deref() == Some("b@x.com")));
}

#[tokio::test]
async fn distinct_contacts_create_distinct_records() {
  let s = store().await;

  s.upsert(by_email("a@x.com", "Paris")).await.unwrap();
  s.upsert(by_email("b@x.com", "Paris")).await.unwrap();
  s.upsert(by_phone("+3312345", "Paris")).await.unwrap();

  assert_eq!(s.list_by_city("Paris").await.unwrap().len(), 3);
}

#[tokio::test]
async fn upsert_without_contact_is_rejected() {
  let s = store().await;

  let err = s
    .upsert(NewSubscriber::new(None, Some("  ".into()), "Paris", None))
    .await
    .unwrap_err();
  assert!(err.is_validation());
  assert!(s.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn upsert_without_city_is_rejected() {
  let s = store().await;

  let err = s.upsert(by_email("a@x.com", "")).await.unwrap_err();
  assert!(err.is_validation());
  assert!(s.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_tags_roundtrip_verbatim() {
  let s = store().await;

  let mut input = by_email("a@x.com", "Oslo");
  input.alert_types = AlertTypes::new(["snow", "rain"]);
  s.upsert(input).await.unwrap();

  let all = s.list_all().await.unwrap();
  assert_eq!(all[0].alert_types.iter().collect::<Vec<_>>(), ["snow", "rain"]);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_cities_is_distinct() {
  let s = store().await;
  assert!(s.list_cities().await.unwrap().is_empty());

  s.upsert(by_email("a@x.com", "Paris")).await.unwrap();
  s.upsert(by_email("b@x.com", "Paris")).await.unwrap();
  s.upsert(by_email("c@x.com", "Lagos")).await.unwrap();

  let cities = s.list_cities().await.unwrap();
  assert_eq!(cities.into_iter().collect::<Vec<_>>(), ["Lagos", "Paris"]);
}

#[tokio::test]
async fn list_by_city_is_case_sensitive() {
  let s = store().await;

  s.upsert(by_email("a@x.com", "Paris")).await.unwrap();

  assert!(s.list_by_city("paris").await.unwrap().is_empty());
  assert!(s.list_by_city("Nowhere").await.unwrap().is_empty());
  assert_eq!(s.list_by_city("Paris").await.unwrap().len(), 1);
}

#[tokio::test]
async fn reads_run_alongside_writes() {
  let s = store().await;
  s.upsert(by_email("seed@x.com", "Paris")).await.unwrap();

  let writer = {
    let s = s.clone();
    tokio::spawn(async move {
      for i in 0..20 {
        s.upsert(by_email(&format!("u{i}@x.com"), "Paris")).await.unwrap();
      }
    })
  };
  for _ in 0..20 {
    let subs = s.list_by_city("Paris").await.unwrap();
    assert!(!subs.is_empty());
  }
  writer.await.unwrap();

  assert_eq!(s.list_by_city("Paris").await.unwrap().len(), 21);
}

#[tokio::test]
async fn reopening_a_file_store_keeps_records() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("alerts.db");

  let s = SqliteStore::open(&path).await.unwrap();
  s.upsert(by_email("a@x.com", "Paris")).await.unwrap();
  s.close().await.unwrap();

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.list_all().await.unwrap().len(), 1);
  s.close().await.unwrap();
}
