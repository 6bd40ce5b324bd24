//! Terminal outcome of one activation attempt.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ActivationOutcome {
  /// Tag written and the passport registered.
  Activated,
  /// The user dismissed the NFC session. Not an error.
  CanceledByUser,
  /// The tag write failed; no activation call was made.
  WriteFailed(String),
  /// The tag was written but no access token was available for the call.
  CredentialMissing,
  /// The tag was written but the activation call failed.
  ActivationCallFailed(String),
}

impl ActivationOutcome {
  pub fn is_activated(&self) -> bool { matches!(self, Self::Activated) }

  /// Whether the card now carries the new payload, regardless of
  /// registration.
  pub fn tag_written(&self) -> bool {
    matches!(
      self,
      Self::Activated | Self::CredentialMissing | Self::ActivationCallFailed(_)
    )
  }

  /// Message for the user. Failures after a successful write say so, so that
  /// nobody rewrites a card when only the registration needs retrying.
  pub fn user_message(&self) -> String {
    match self {
      Self::Activated => "Passport activated.".to_string(),
      Self::CanceledByUser => "Write canceled. Nothing was changed.".to_string(),
      Self::WriteFailed(reason) => {
        format!("Could not write the passport: {reason}")
      }
      Self::CredentialMissing => {
        "The passport was written, but you are not signed in, so it could not \
         be registered. Sign in and try again."
          .to_string()
      }
      Self::ActivationCallFailed(reason) => format!(
        "The passport was written, but registering it failed: {reason}. \
         Retrying will overwrite the card with the same data."
      ),
    }
  }
}
