//! The remote activation endpoint.

use std::future::Future;

use crate::{credentials::AccessToken, passport::PassportId};

/// Registers a passport as live on the remote service.
///
/// The wire shape is owned by the implementation. Any `Err` is reported to
/// the caller as a failed activation call; the workflow never retries.
pub trait ActivationService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn activate(
    &self,
    id: PassportId,
    token: &AccessToken,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
