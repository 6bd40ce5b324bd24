//! Async HTTP client for the passport service.

use std::time::Duration;

use passport_core::{
  Passport, PassportId, activation::ActivationService, credentials::AccessToken,
};
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_BASE: &str = "https://id.purduehackers.com/api";

/// Connection settings for the passport service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_API_BASE.to_string(),
      timeout:  Duration::from_secs(30),
    }
  }
}

/// Async HTTP client for the passport REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder, token: &AccessToken) -> RequestBuilder {
    req.bearer_auth(token.expose())
  }

  /// `GET /passports/<id>`
  pub async fn get_passport(
    &self,
    id: PassportId,
    token: &AccessToken,
  ) -> Result<Passport> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/passports/{id}"))), token)
      .send()
      .await?;
    let resp = ensure_success(resp).await?;
    Ok(resp.json().await?)
  }

  /// `POST /passports/<id>/activate`
  ///
  /// Any 2xx is success; the response body is ignored.
  pub async fn activate_passport(
    &self,
    id: PassportId,
    token: &AccessToken,
  ) -> Result<()> {
    let resp = self
      .auth(
        self.client.post(self.url(&format!("/passports/{id}/activate"))),
        token,
      )
      .send()
      .await?;
    let resp = ensure_success(resp).await?;
    debug!(passport_id = %id, status = %resp.status(), "activation accepted");
    Ok(())
  }
}

impl ActivationService for ApiClient {
  type Error = ClientError;

  async fn activate(
    &self,
    id: PassportId,
    token: &AccessToken,
  ) -> Result<(), ClientError> {
    self.activate_passport(id, token).await
  }
}

async fn ensure_success(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(ClientError::Status {
    status: status.as_u16(),
    body,
  })
}
