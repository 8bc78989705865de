//! Core types and trait definitions for the squall weather-alert relay.
//!
//! No HTTP, SMTP or database code lives here. Storage backends, the weather
//! provider client and notification channels implement the traits defined
//! in [`store`], [`weather`] and [`channel`].

// Trait methods return `impl Future + Send`; implementors use `async fn`.
#![allow(async_fn_in_trait)]

pub mod alert;
pub mod channel;
pub mod error;
pub mod rules;
pub mod store;
pub mod subscriber;
pub mod weather;

pub use error::{Error, FetchError, Result};
