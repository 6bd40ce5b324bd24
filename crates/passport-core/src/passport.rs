//! Passport — the flat record describing one physical NFC card.
//!
//! The record is owned by the remote service; this crate only reads it. Field
//! names on the wire are camelCase.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Numeric passport identifier, as used in scan and image URLs.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PassportId(pub i64);

impl fmt::Display for PassportId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<i64> for PassportId {
  fn from(id: i64) -> Self { Self(id) }
}

// ─── Secret ──────────────────────────────────────────────────────────────────

/// Bearer capability embedded in the tag and in the scan URL.
///
/// `Debug` and `Display` print a mask. The raw value is only reachable through
/// [`PassportSecret::expose`]; use [`PassportSecret::fingerprint`] when a
/// secret needs to be correlated in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassportSecret(String);

impl PassportSecret {
  pub fn new(secret: impl Into<String>) -> Self { Self(secret.into()) }

  pub fn expose(&self) -> &str { &self.0 }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// First eight bytes of the SHA-256 digest, hex encoded.
  pub fn fingerprint(&self) -> String {
    let digest = Sha256::digest(self.0.as_bytes());
    hex::encode(&digest[..8])
  }
}

impl fmt::Debug for PassportSecret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PassportSecret(********)")
  }
}

impl fmt::Display for PassportSecret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("********")
  }
}

// ─── Passport ────────────────────────────────────────────────────────────────

/// A passport record as returned by the passport service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passport {
  pub id:              PassportId,
  pub owner_id:        i64,
  pub version:         i32,
  pub name:            String,
  pub surname:         String,
  pub date_of_birth:   DateTime<Utc>,
  pub date_of_issue:   DateTime<Utc>,
  pub place_of_origin: String,
  pub secret:          PassportSecret,
  #[serde(default)]
  pub activated:       bool,
}

/// Whether the passport has been registered as live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationState {
  Activated,
  NotActivated,
}

impl ActivationState {
  pub fn label(self) -> &'static str {
    match self {
      Self::Activated => "Activated",
      Self::NotActivated => "Not activated",
    }
  }
}

impl Passport {
  /// Check the fields the workflow embeds in the tag.
  pub fn validate(&self) -> Result<()> {
    if self.id.0 <= 0 {
      return Err(Error::InvalidPassport(format!(
        "id must be positive, got {}",
        self.id
      )));
    }
    if self.secret.is_empty() {
      return Err(Error::InvalidPassport(format!(
        "passport {} has an empty secret",
        self.id
      )));
    }
    Ok(())
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.name, self.surname)
  }

  pub fn state(&self) -> ActivationState {
    if self.activated {
      ActivationState::Activated
    } else {
      ActivationState::NotActivated
    }
  }

  /// Label for the write button. Writing an activated passport overwrites it.
  pub fn action_label(&self) -> &'static str {
    if self.activated {
      "Overwrite passport"
    } else {
      "Activate passport"
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  pub(crate) fn sample() -> Passport {
    serde_json::from_value(serde_json::json!({
      "id": 12,
      "ownerId": 12,
      "version": 0,
      "surname": "Stanciu",
      "name": "Matthew",
      "dateOfBirth": "2002-02-17T00:00:00.000Z",
      "dateOfIssue": "2024-02-09T00:00:00.000Z",
      "placeOfOrigin": "The woods",
      "secret": "cUWnYREMmNdvOQI2M9uhTczeRStj0fmq",
      "activated": false
    }))
    .unwrap()
  }

  #[test]
  fn deserializes_service_json() {
    let p = sample();
    assert_eq!(p.id, PassportId(12));
    assert_eq!(p.owner_id, 12);
    assert_eq!(p.place_of_origin, "The woods");
    assert_eq!(p.secret.expose(), "cUWnYREMmNdvOQI2M9uhTczeRStj0fmq");
    assert_eq!(p.date_of_birth.to_rfc3339(), "2002-02-17T00:00:00+00:00");
  }

  #[test]
  fn debug_output_masks_secret() {
    let p = sample();
    let debug = format!("{p:?}");
    assert!(!debug.contains("cUWnYREMmNdvOQI2M9uhTczeRStj0fmq"));
    assert!(debug.contains("********"));
    assert_eq!(p.secret.to_string(), "********");
  }

  #[test]
  fn fingerprint_is_stable_and_short() {
    let p = sample();
    let fp = p.secret.fingerprint();
    assert_eq!(fp.len(), 16);
    assert_eq!(fp, PassportSecret::new(p.secret.expose()).fingerprint());
    assert!(!fp.contains(p.secret.expose()));
  }

  #[test]
  fn validate_rejects_empty_secret_and_bad_id() {
    let mut p = sample();
    assert!(p.validate().is_ok());

    p.secret = PassportSecret::new("");
    assert!(matches!(p.validate(), Err(Error::InvalidPassport(_))));

    let mut p = sample();
    p.id = PassportId(0);
    assert!(matches!(p.validate(), Err(Error::InvalidPassport(_))));
  }

  #[test]
  fn action_label_follows_activation() {
    let mut p = sample();
    assert_eq!(p.action_label(), "Activate passport");
    assert_eq!(p.state(), ActivationState::NotActivated);

    p.activated = true;
    assert_eq!(p.action_label(), "Overwrite passport");
    assert_eq!(p.state().label(), "Activated");
    assert_eq!(p.full_name(), "Matthew Stanciu");
  }
}
