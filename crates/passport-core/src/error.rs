//! Error types for `passport-core`.

use thiserror::Error;

use crate::passport::PassportId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid passport: {0}")]
  InvalidPassport(String),

  #[error("invalid url: {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("base url cannot carry a path: {0}")]
  OpaqueBaseUrl(String),

  #[error("an activation is already in flight for passport {0}")]
  AlreadyInFlight(PassportId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
