//! Plain-text passport detail view.

use std::fmt::Write as _;

use passport_core::{ActivationOutcome, Passport, links::Links};

/// Render the detail screen for `passport`.
///
/// The secret is masked unless `reveal_secret` is set.
pub fn render_detail(passport: &Passport, links: &Links, reveal_secret: bool) -> String {
  let secret = if reveal_secret {
    passport.secret.expose().to_string()
  } else {
    passport.secret.to_string()
  };

  let rows = [
    ("image", links.image_url(passport.id).to_string()),
    ("id", passport.id.to_string()),
    ("secret", secret),
    ("status", passport.state().label().to_string()),
    ("origin", passport.place_of_origin.clone()),
    ("born", passport.date_of_birth.format("%Y-%m-%d").to_string()),
    ("issued", passport.date_of_issue.format("%Y-%m-%d").to_string()),
  ];

  let mut out = String::new();
  let _ = writeln!(out, "{}", passport.full_name());
  for (label, value) in rows {
    let _ = writeln!(out, "  {label:<8}{value}");
  }
  let _ = writeln!(out);
  let _ = writeln!(out, "[ {} ]", passport.action_label());
  out
}

/// The alert shown after a run.
pub fn render_outcome(outcome: &ActivationOutcome) -> String {
  let title = match outcome {
    ActivationOutcome::Activated => "Activated",
    ActivationOutcome::CanceledByUser => "Canceled",
    ActivationOutcome::WriteFailed(_) => "Error writing passport",
    ActivationOutcome::CredentialMissing
    | ActivationOutcome::ActivationCallFailed(_) => "Error activating",
  };
  format!("{title}: {}", outcome.user_message())
}
