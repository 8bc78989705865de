//! Rule engine: a pure mapping from a [`WeatherSnapshot`] to the alert
//! conditions it triggers.
//!
//! Rules are evaluated in registration order; the default engine checks rain,
//! then heat, then wind.

use crate::{
  alert::{AlertCondition, AlertType},
  weather::WeatherSnapshot,
};

/// Temperature above which the heat rule triggers, °C (exclusive).
pub const HEAT_THRESHOLD_C: f64 = 35.0;

/// Wind speed above which the wind rule triggers, km/h (exclusive).
pub const WIND_THRESHOLD_KMH: f64 = 50.0;

type Predicate = Box<dyn Fn(&WeatherSnapshot) -> bool + Send + Sync>;

/// One independent check: a predicate and the condition it reports.
pub struct Rule {
  kind:        AlertType,
  title:       String,
  description: String,
  predicate:   Predicate,
}

impl Rule {
  pub fn new<F>(
    kind: AlertType,
    title: impl Into<String>,
    description: impl Into<String>,
    predicate: F,
  ) -> Self
  where
    F: Fn(&WeatherSnapshot) -> bool + Send + Sync + 'static,
  {
    Self {
      kind,
      title: title.into(),
      description: description.into(),
      predicate: Box::new(predicate),
    }
  }

  pub fn kind(&self) -> AlertType { self.kind }

  fn check(&self, snapshot: &WeatherSnapshot) -> Option<AlertCondition> {
    (self.predicate)(snapshot).then(|| AlertCondition {
      kind:        self.kind,
      title:       self.title.clone(),
      description: self.description.clone(),
    })
  }

  /// Triggers when the primary condition mentions rain, in any case.
  pub fn rain() -> Self {
    Self::new(
      AlertType::Rain,
      "Rain Alert",
      "Rain detected in your area. Carry an umbrella!",
      |s| s.condition.to_lowercase().contains("rain"),
    )
  }

  /// Triggers above [`HEAT_THRESHOLD_C`].
  pub fn heat() -> Self {
    Self::new(
      AlertType::Heat,
      "Heat Warning",
      "Extreme heat detected. Stay hydrated!",
      |s| s.temperature_c > HEAT_THRESHOLD_C,
    )
  }

  /// Triggers above [`WIND_THRESHOLD_KMH`].
  pub fn wind() -> Self {
    Self::new(
      AlertType::Wind,
      "High Winds Warning",
      "High winds detected. Secure loose objects!",
      |s| s.wind_speed_kmh() > WIND_THRESHOLD_KMH,
    )
  }
}

impl std::fmt::Debug for Rule {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Rule")
      .field("kind", &self.kind)
      .field("title", &self.title)
      .finish_non_exhaustive()
  }
}

/// An ordered list of rules evaluated against the same snapshot.
#[derive(Debug)]
pub struct RuleEngine {
  rules: Vec<Rule>,
}

impl Default for RuleEngine {
  fn default() -> Self { Self { rules: vec![Rule::rain(), Rule::heat(), Rule::wind()] } }
}

impl RuleEngine {
  /// An engine with no rules; never triggers.
  pub fn empty() -> Self { Self { rules: Vec::new() } }

  /// Append a rule after the existing ones.
  pub fn with_rule(mut self, rule: Rule) -> Self {
    self.rules.push(rule);
    self
  }

  /// Evaluate every rule in order. Each alert type appears at most once in the
  /// result; when two rules share a type, the first one to trigger wins.
  pub fn evaluate(&self, snapshot: &WeatherSnapshot) -> Vec<AlertCondition> {
    let mut triggered: Vec<AlertCondition> = Vec::new();
    for rule in &self.rules {
      if triggered.iter().any(|c| c.kind == rule.kind) {
        continue;
      }
      if let Some(condition) = rule.check(snapshot) {
        triggered.push(condition);
      }
    }
    triggered
  }
}
