//! Access-token lookup.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};

/// OAuth bearer token used for the activation call. `Debug` is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
  pub fn new(token: impl Into<String>) -> Self { Self(token.into()) }

  pub fn expose(&self) -> &str { &self.0 }
}

impl fmt::Debug for AccessToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("AccessToken(********)")
  }
}

/// Abstraction over the secure store holding the user's OAuth credentials.
///
/// `Ok(None)` means the user has no stored token. The workflow reads the token
/// once per run and never writes or refreshes it.
pub trait CredentialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn access_token(
    &self,
  ) -> impl Future<Output = Result<Option<AccessToken>, Self::Error>> + Send;
}
