//! The passport activation workflow.
//!
//! One run is a single linear attempt:
//!
//! 1. build the scan URL from the passport id and secret,
//! 2. ask the [`TagWriter`] to write it to a card,
//! 3. stop on cancel or write failure,
//! 4. otherwise call the [`ActivationService`] with the id and access token.
//!
//! The activation call is never issued unless the write returned
//! [`WriteResult::Written`]. Nothing is retried; every collaborator failure is
//! converted into an [`ActivationOutcome`].

use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::{
  activation::ActivationService,
  credentials::{AccessToken, CredentialStore},
  error::{Error, Result},
  guard::InFlightGuard,
  links::Links,
  outcome::ActivationOutcome,
  passport::Passport,
  tag::{TagPayload, TagWriter, WriteResult},
};

pub struct ActivationWorkflow<W, A> {
  links:     Links,
  writer:    W,
  service:   A,
  in_flight: InFlightGuard,
}

impl<W, A> ActivationWorkflow<W, A>
where
  W: TagWriter,
  A: ActivationService,
{
  pub fn new(links: Links, writer: W, service: A) -> Self {
    Self {
      links,
      writer,
      service,
      in_flight: InFlightGuard::new(),
    }
  }

  pub fn links(&self) -> &Links { &self.links }

  pub fn writer(&self) -> &W { &self.writer }

  pub fn service(&self) -> &A { &self.service }

  /// The guard consulted by [`Self::run`]. Callers that track in-flight state
  /// elsewhere (e.g. to disable a button) can share it.
  pub fn in_flight(&self) -> &InFlightGuard { &self.in_flight }

  /// Read the access token from `credentials` and run one activation.
  ///
  /// Returns [`Error::AlreadyInFlight`] without touching any collaborator if
  /// another run for the same passport has not finished yet. A failing
  /// credential store is treated like an empty one.
  pub async fn run<C>(
    &self,
    passport: &Passport,
    credentials: &C,
  ) -> Result<ActivationOutcome>
  where
    C: CredentialStore,
  {
    passport.validate()?;
    let Some(_ticket) = self.in_flight.try_acquire(passport.id) else {
      return Err(Error::AlreadyInFlight(passport.id));
    };

    let token = match credentials.access_token().await {
      Ok(token) => token,
      Err(e) => {
        warn!(passport_id = %passport.id, error = %e, "credential lookup failed");
        None
      }
    };

    self.activate(passport, token.as_ref()).await
  }

  /// Write the tag and, on success, register the passport using `token`.
  ///
  /// Only an invalid passport produces `Err`; everything else is an outcome.
  pub async fn activate(
    &self,
    passport: &Passport,
    token: Option<&AccessToken>,
  ) -> Result<ActivationOutcome> {
    passport.validate()?;

    let span = info_span!(
      "activation",
      passport_id = %passport.id,
      attempt = %Uuid::new_v4(),
      secret_fp = %passport.secret.fingerprint(),
    );

    let outcome = self
      .activate_inner(passport, token)
      .instrument(span)
      .await;
    Ok(outcome)
  }

  async fn activate_inner(
    &self,
    passport: &Passport,
    token: Option<&AccessToken>,
  ) -> ActivationOutcome {
    let payload = TagPayload {
      url:    self.links.activation_url(passport.id, &passport.secret),
      id:     passport.id,
      secret: passport.secret.clone(),
    };

    info!(overwrite = passport.activated, "requesting tag write");
    match self.writer.write_tag(&payload).await {
      WriteResult::Written => info!("tag written"),
      WriteResult::CanceledByUser => {
        info!("tag write canceled by user");
        return ActivationOutcome::CanceledByUser;
      }
      WriteResult::Failed(reason) => {
        warn!(%reason, "tag write failed");
        return ActivationOutcome::WriteFailed(reason);
      }
    }

    let Some(token) = token else {
      warn!("tag written but no access token is available");
      return ActivationOutcome::CredentialMissing;
    };

    match self.service.activate(passport.id, token).await {
      Ok(()) => {
        info!("passport activated");
        ActivationOutcome::Activated
      }
      Err(e) => {
        warn!(error = %e, "activation call failed after tag write");
        ActivationOutcome::ActivationCallFailed(e.to_string())
      }
    }
  }
}
