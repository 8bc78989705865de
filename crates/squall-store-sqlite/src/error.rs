//! Error type for `squall-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid subscriber data: {0}")]
  Core(#[from] squall_core::Error),

  #[error("sqlite: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("stored subscriber id is malformed: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("stored created_at is malformed: {0}")]
  DateParse(String),
}

impl Error {
  /// Whether the input was rejected before anything was written.
  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Core(squall_core::Error::Validation(_)))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
