//! Email rendering for triggered alerts.

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde_json::json;
use squall_core::{
  alert::AlertCondition,
  channel::OutboundMessage,
  weather::WeatherSnapshot,
};

use crate::Result;

const SUBJECT_TEMPLATE: &str = "alert-subject";
const BODY_TEMPLATE: &str = "alert-body";

/// Renders one [`OutboundMessage`] per (recipient, condition) pair.
///
/// Values are HTML-escaped by the registry; city and condition text come from
/// the weather provider.
pub struct MessageRenderer {
  registry: Handlebars<'static>,
}

impl MessageRenderer {
  pub fn new() -> Result<Self> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);

    registry
      .register_template_string(SUBJECT_TEMPLATE, "Weather Alert: {{title}}")
      .map_err(Box::new)?;

    registry
      .register_template_string(
        BODY_TEMPLATE,
        r#"<h2>Weather Alert for {{city}}</h2>
<p><strong>Alert:</strong> {{alert}}</p>
<p><strong>Current Temperature:</strong> {{temperature}}°C</p>
<p><strong>Condition:</strong> {{condition}}</p>
<p><strong>Time:</strong> {{generated_at}}</p>
<hr>
<p><small>This alert was sent by the squall weather-alert relay</small></p>"#,
      )
      .map_err(Box::new)?;

    Ok(Self { registry })
  }

  pub fn render(
    &self,
    recipient: &str,
    snapshot: &WeatherSnapshot,
    condition: &AlertCondition,
    generated_at: DateTime<Utc>,
  ) -> Result<OutboundMessage, handlebars::RenderError> {
    let data = json!({
      "title":        condition.title,
      "alert":        condition.description,
      "city":         snapshot.city,
      "temperature":  snapshot.temperature_c.round() as i64,
      "condition":    snapshot.description,
      "generated_at": generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    });

    Ok(OutboundMessage {
      recipient: recipient.to_owned(),
      subject:   self.registry.render(SUBJECT_TEMPLATE, &data)?,
      body:      self.registry.render(BODY_TEMPLATE, &data)?,
    })
  }
}
