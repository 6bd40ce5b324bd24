//! Credential stores backed by a JSON file or by memory.
//!
//! The file holds the OAuth record the app keeps in its keychain:
//!
//! ```json
//! { "accessToken": "...", "tokenType": "Bearer", "expiresAt": "2026-01-01T00:00:00Z" }
//! ```

use std::{
  convert::Infallible,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use passport_core::credentials::{AccessToken, CredentialStore};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt as _;
use tracing::{debug, warn};

use crate::error::Result;

/// The stored OAuth grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthRecord {
  pub access_token: AccessToken,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub token_type:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub expires_at:   Option<DateTime<Utc>>,
}

impl OAuthRecord {
  pub fn new(access_token: AccessToken) -> Self {
    Self {
      access_token,
      token_type: Some("Bearer".to_string()),
      expires_at: None,
    }
  }

  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.expires_at.is_some_and(|at| at <= now)
  }
}

// ─── File store ──────────────────────────────────────────────────────────────

/// Reads the OAuth record from a JSON file.
///
/// A missing file or an expired record both mean "no token".
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
  path: PathBuf,
}

impl FileCredentialStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  pub async fn load(&self) -> Result<Option<OAuthRecord>> {
    let raw = match tokio::fs::read(&self.path).await {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "no credential file");
        return Ok(None);
      }
      Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&raw)?))
  }

  /// Write `record`, replacing any existing file.
  ///
  /// The record goes to a sibling temp file first and is renamed into place,
  /// so readers never see a partial file. On Unix the temp file is created
  /// with mode `0600`, so the token is never readable by other users, even
  /// when it replaces an existing file with looser permissions.
  pub async fn save(&self, record: &OAuthRecord) -> Result<()> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }
    let raw = serde_json::to_vec_pretty(record)?;

    let tmp = self.tmp_path();
    match tokio::fs::remove_file(&tmp).await {
      Ok(()) => {}
      Err(e) if e.kind() == ErrorKind::NotFound => {}
      Err(e) => return Err(e.into()),
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(&tmp).await?;
    let written = async {
      file.write_all(&raw).await?;
      file.sync_all().await
    }
    .await;
    drop(file);
    if let Err(e) = written {
      let _ = tokio::fs::remove_file(&tmp).await;
      return Err(e.into());
    }

    if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
      let _ = tokio::fs::remove_file(&tmp).await;
      return Err(e.into());
    }
    Ok(())
  }

  fn tmp_path(&self) -> PathBuf {
    let mut name = self
      .path
      .file_name()
      .map(|n| n.to_os_string())
      .unwrap_or_default();
    name.push(".tmp");
    self.path.with_file_name(name)
  }

  /// Remove the stored record. Succeeds if there was none.
  pub async fn clear(&self) -> Result<()> {
    match tokio::fs::remove_file(&self.path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

impl CredentialStore for FileCredentialStore {
  type Error = crate::error::ClientError;

  async fn access_token(&self) -> Result<Option<AccessToken>> {
    let Some(record) = self.load().await? else {
      return Ok(None);
    };
    if record.is_expired(Utc::now()) {
      warn!(path = %self.path.display(), "stored access token has expired");
      return Ok(None);
    }
    Ok(Some(record.access_token))
  }
}

// ─── Memory store ────────────────────────────────────────────────────────────

/// A fixed token, e.g. one supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore(Option<AccessToken>);

impl MemoryCredentialStore {
  pub fn new(token: Option<AccessToken>) -> Self { Self(token) }
}

impl CredentialStore for MemoryCredentialStore {
  type Error = Infallible;

  async fn access_token(&self) -> Result<Option<AccessToken>, Infallible> {
    Ok(self.0.clone())
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;
  use crate::error::ClientError;

  fn store_in(dir: &tempfile::TempDir) -> FileCredentialStore {
    FileCredentialStore::new(dir.path().join("oauth.json"))
  }

  #[tokio::test]
  async fn missing_file_means_no_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert!(store.access_token().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn reads_token_written_by_app() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), r#"{ "accessToken": "tok-abc" }"#).unwrap();

    let token = store.access_token().await.unwrap().unwrap();
    assert_eq!(token.expose(), "tok-abc");
  }

  #[tokio::test]
  async fn save_then_clear() {
    let dir = tempfile::tempdir().unwrap();
    let store =
      FileCredentialStore::new(dir.path().join("nested").join("oauth.json"));

    store
      .save(&OAuthRecord::new(AccessToken::new("tok-abc")))
      .await
      .unwrap();
    let record = store.load().await.unwrap().unwrap();
    assert_eq!(record.access_token.expose(), "tok-abc");
    assert_eq!(record.token_type.as_deref(), Some("Bearer"));

    store.clear().await.unwrap();
    assert!(store.load().await.unwrap().is_none());
    // Clearing twice is fine.
    store.clear().await.unwrap();
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn saved_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store
      .save(&OAuthRecord::new(AccessToken::new("tok")))
      .await
      .unwrap();
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn save_over_world_readable_file_tightens_mode() {
    use std::{fs::Permissions, os::unix::fs::PermissionsExt};

    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), r#"{ "accessToken": "old" }"#).unwrap();
    std::fs::set_permissions(store.path(), Permissions::from_mode(0o644))
      .unwrap();

    store
      .save(&OAuthRecord::new(AccessToken::new("new")))
      .await
      .unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    let token = store.access_token().await.unwrap().unwrap();
    assert_eq!(token.expose(), "new");
    assert!(!dir.path().join("oauth.json.tmp").exists());
  }

  #[tokio::test]
  async fn stale_temp_file_does_not_block_save() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::write(dir.path().join("oauth.json.tmp"), "leftover").unwrap();

    store
      .save(&OAuthRecord::new(AccessToken::new("tok")))
      .await
      .unwrap();
    assert_eq!(
      store.access_token().await.unwrap().unwrap().expose(),
      "tok"
    );
  }

  #[tokio::test]
  async fn expired_record_means_no_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let mut record = OAuthRecord::new(AccessToken::new("old"));
    record.expires_at = Some(Utc::now() - Duration::hours(1));
    store.save(&record).await.unwrap();

    assert!(store.access_token().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "not json").unwrap();

    let err = store.access_token().await.unwrap_err();
    assert!(matches!(err, ClientError::Json(_)));
  }

  #[test]
  fn record_debug_is_redacted() {
    let record = OAuthRecord::new(AccessToken::new("tok-abc"));
    assert!(!format!("{record:?}").contains("tok-abc"));
  }

  #[tokio::test]
  async fn memory_store_returns_its_token() {
    let store = MemoryCredentialStore::new(Some(AccessToken::new("t")));
    assert_eq!(store.access_token().await.unwrap().unwrap().expose(), "t");
    let empty = MemoryCredentialStore::default();
    assert!(empty.access_token().await.unwrap().is_none());
  }
}
