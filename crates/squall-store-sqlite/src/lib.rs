//! `SubscriberStore` on a single SQLite file.
//!
//! Every statement runs on the `tokio_rusqlite` connection thread, so upserts
//! are serialised and readers never see a half-replaced subscriber.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
