//! The alert pipeline: render and deliver notifications, match triggered
//! conditions to subscribers, and poll subscribed cities on a timer.
//!
//! Control flow per poll cycle:
//!
//! ```text
//! Scheduler ─(per city, concurrently)─▶ WeatherProvider::current
//!           ─▶ Orchestrator::process_snapshot
//!                ├─ RuleEngine::evaluate
//!                ├─ SubscriberStore::list_by_city
//!                └─ Notifier::send  (one per subscriber × matching condition)
//! ```

pub mod error;
pub mod message;
pub mod notifier;
pub mod orchestrator;
pub mod scheduler;

pub use error::{DeliveryFailure, Error, Result};
pub use notifier::Notifier;
pub use orchestrator::{DispatchReport, Orchestrator};
pub use scheduler::{CityOutcome, CycleReport, Scheduler};

#[cfg(test)]
mod testing;
