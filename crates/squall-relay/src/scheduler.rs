//! [`Scheduler`]: periodic fan-out over every subscribed city.

use std::{sync::Arc, time::Duration};

use squall_core::{
  FetchError,
  channel::NotificationChannel,
  store::SubscriberStore,
  weather::WeatherProvider,
};
use tokio::{task::JoinSet, time::MissedTickBehavior};
use tracing::{error, info, warn};

use crate::{DispatchReport, Orchestrator};

/// Default time between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3 * 60 * 60);

/// Shortest interval [`Scheduler::new`] accepts; shorter values are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Result of checking one city during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityOutcome {
  Processed(DispatchReport),
  FetchFailed(FetchError),
  /// The store failed while looking up the city's subscribers.
  StoreFailed(String),
}

/// Per-city outcomes of one poll cycle, sorted by city name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
  pub cities: Vec<(String, CityOutcome)>,
}

impl CycleReport {
  pub fn outcome(&self, city: &str) -> Option<&CityOutcome> {
    self.cities.iter().find(|(c, _)| c == city).map(|(_, o)| o)
  }
}

/// Timer plus fan-out driver. Holds no alert state of its own.
pub struct Scheduler<S, W, C> {
  store:        Arc<S>,
  provider:     Arc<W>,
  orchestrator: Arc<Orchestrator<S, C>>,
  interval:     Duration,
}

impl<S, W, C> Scheduler<S, W, C>
where
  S: SubscriberStore + 'static,
  W: WeatherProvider + 'static,
  C: NotificationChannel + 'static,
{
  pub fn new(
    store: Arc<S>,
    provider: Arc<W>,
    orchestrator: Arc<Orchestrator<S, C>>,
    interval: Duration,
  ) -> Self {
    if interval < MIN_POLL_INTERVAL {
      warn!(?interval, minimum = ?MIN_POLL_INTERVAL, "poll interval too short; using minimum");
    }
    Self { store, provider, orchestrator, interval: interval.max(MIN_POLL_INTERVAL) }
  }

  pub fn interval(&self) -> Duration { self.interval }

  /// Run a cycle immediately, then one every `interval`, forever.
  ///
  /// Each cycle runs in its own task. A cycle that outlasts the interval is
  /// not cancelled, so an exceptionally slow cycle may overlap the next one.
  /// Cycle tasks are owned by this future: dropping or aborting it cancels
  /// any cycle still in flight.
  pub async fn run(self: Arc<Self>) {
    let mut ticker = tokio::time::interval(self.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cycles = JoinSet::new();

    info!(interval = ?self.interval, "alert scheduler started");
    loop {
      ticker.tick().await;
      while let Some(finished) = cycles.try_join_next() {
        if let Err(e) = finished {
          error!(error = %e, "poll cycle task failed");
        }
      }
      let this = Arc::clone(&self);
      cycles.spawn(async move {
        this.run_cycle().await;
      });
    }
  }

  /// One full pass over every subscribed city, checked concurrently.
  pub async fn run_cycle(&self) -> CycleReport {
    let cities = match self.store.list_cities().await {
      Ok(cities) => cities,
      Err(e) => {
        error!(error = %e, "failed to list subscribed cities; skipping cycle");
        return CycleReport::default();
      }
    };

    if cities.is_empty() {
      info!("no subscribed cities; skipping cycle");
      return CycleReport::default();
    }

    info!(count = cities.len(), ?cities, "starting alert check");

    let mut tasks = JoinSet::new();
    for city in cities {
      let provider = Arc::clone(&self.provider);
      let orchestrator = Arc::clone(&self.orchestrator);
      tasks.spawn(async move {
        let outcome = check_city(provider.as_ref(), orchestrator.as_ref(), &city).await;
        (city, outcome)
      });
    }

    let mut report = CycleReport::default();
    while let Some(joined) = tasks.join_next().await {
      match joined {
        Ok(entry) => report.cities.push(entry),
        Err(e) => error!(error = %e, "city check task failed"),
      }
    }
    report.cities.sort_by(|a, b| a.0.cmp(&b.0));

    info!(cities = report.cities.len(), "alert check completed");
    report
  }
}

async fn check_city<S, W, C>(
  provider: &W,
  orchestrator: &Orchestrator<S, C>,
  city: &str,
) -> CityOutcome
where
  S: SubscriberStore,
  W: WeatherProvider,
  C: NotificationChannel,
{
  let snapshot = match provider.current(city).await {
    Ok(snapshot) => snapshot,
    Err(e) => {
      warn!(%city, error = %e, "weather fetch failed");
      return CityOutcome::FetchFailed(e);
    }
  };

  match orchestrator.process_snapshot(&snapshot).await {
    Ok(report) => CityOutcome::Processed(report),
    Err(e) => {
      error!(%city, error = %e, "subscriber lookup failed");
      CityOutcome::StoreFailed(e.to_string())
    }
  }
}
