//! The NFC tag-writing capability.
//!
//! Radio and NDEF details belong to the platform's NFC service; the workflow
//! only hands over what should end up on the card and waits for the result.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::passport::{PassportId, PassportSecret};

/// Everything written to a passport card in a single write.
///
/// `Debug` masks the `secret` query value of `url` as well as `secret`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TagPayload {
  pub url:    Url,
  pub id:     PassportId,
  pub secret: PassportSecret,
}

impl TagPayload {
  /// `url` with every `secret` query value replaced by a mask.
  pub fn redacted_url(&self) -> String {
    let mut url = self.url.clone();
    let pairs: Vec<(String, String)> = self
      .url
      .query_pairs()
      .map(|(k, v)| {
        let v = if k == "secret" { "********".to_string() } else { v.into_owned() };
        (k.into_owned(), v)
      })
      .collect();
    if !pairs.is_empty() {
      url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.to_string()
  }
}

impl fmt::Debug for TagPayload {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TagPayload")
      .field("url", &self.redacted_url())
      .field("id", &self.id)
      .field("secret", &self.secret)
      .finish()
  }
}

/// Result of one tag write session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
  Written,
  /// The user dismissed the write session before a tag was written.
  CanceledByUser,
  /// Hardware or protocol failure; the tag contents are unknown.
  Failed(String),
}

/// Abstraction over the platform NFC service.
///
/// `write_tag` resolves only once the user has presented a tag, canceled, or
/// the hardware has reported an error. It has no timeout of its own.
pub trait TagWriter: Send + Sync {
  fn write_tag(
    &self,
    payload: &TagPayload,
  ) -> impl Future<Output = WriteResult> + Send;
}
