//! Process-level wiring for the squall weather-alert relay.
//!
//! The `squall` binary (see `main.rs`) combines these pieces:
//!
//! - [`settings`]: layered configuration (TOML file plus `SQUALL_*` env vars)
//! - [`openweather`]: the OpenWeatherMap [`WeatherProvider`] implementation
//! - [`mail`]: the SMTP [`NotificationChannel`] implementation
//!
//! [`WeatherProvider`]: squall_core::weather::WeatherProvider
//! [`NotificationChannel`]: squall_core::channel::NotificationChannel

pub mod mail;
pub mod openweather;
pub mod settings;

pub use mail::SmtpChannel;
pub use openweather::OpenWeatherClient;
pub use settings::Settings;
