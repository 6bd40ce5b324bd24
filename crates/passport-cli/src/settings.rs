//! Layered configuration: built-in defaults, then the TOML file, then
//! `PASSPORT_*` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use passport_client::api::DEFAULT_API_BASE;
use passport_core::links::{DEFAULT_IMAGE_BASE, DEFAULT_SCAN_BASE, Links};
use serde::Deserialize;

const DEFAULT_CREDENTIALS_PATH: &str = "~/.config/passport/oauth.json";
const DEFAULT_TAG_PATH: &str = "passport-tag.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub scan_base:         String,
  pub image_base:        String,
  pub api_base:          String,
  pub credentials_path:  PathBuf,
  pub tag_path:          PathBuf,
  pub http_timeout_secs: u64,
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("scan_base", DEFAULT_SCAN_BASE)?
      .set_default("image_base", DEFAULT_IMAGE_BASE)?
      .set_default("api_base", DEFAULT_API_BASE)?
      .set_default("credentials_path", DEFAULT_CREDENTIALS_PATH)?
      .set_default("tag_path", DEFAULT_TAG_PATH)?
      .set_default("http_timeout_secs", 30_i64)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PASSPORT"))
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise Settings")?;
    if settings.http_timeout_secs == 0 {
      anyhow::bail!("http_timeout_secs must be at least 1");
    }
    settings.credentials_path = expand_tilde(&settings.credentials_path);
    settings.tag_path = expand_tilde(&settings.tag_path);
    Ok(settings)
  }

  pub fn links(&self) -> anyhow::Result<Links> {
    Links::new(&self.scan_base, &self.image_base)
      .context("invalid scan or image base url")
  }

  pub fn http_timeout(&self) -> Duration {
    Duration::from_secs(self.http_timeout_secs)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.scan_base, DEFAULT_SCAN_BASE);
    assert_eq!(settings.image_base, DEFAULT_IMAGE_BASE);
    assert_eq!(settings.tag_path, PathBuf::from(DEFAULT_TAG_PATH));
    assert_eq!(settings.http_timeout(), Duration::from_secs(30));
    assert!(settings.links().is_ok());
  }

  #[test]
  fn file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("passport.toml");
    std::fs::write(
      &path,
      r#"
        api_base = "http://localhost:8080/api"
        tag_path = "/tmp/tag.json"
        http_timeout_secs = 5
      "#,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.api_base, "http://localhost:8080/api");
    assert_eq!(settings.tag_path, PathBuf::from("/tmp/tag.json"));
    assert_eq!(settings.http_timeout(), Duration::from_secs(5));
    assert_eq!(settings.scan_base, DEFAULT_SCAN_BASE);
  }

  #[test]
  fn zero_timeout_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("passport.toml");
    std::fs::write(&path, "http_timeout_secs = 0").unwrap();

    let err = Settings::load(&path).unwrap_err();
    assert!(err.to_string().contains("http_timeout_secs"));
  }

  #[test]
  fn bad_base_url_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("passport.toml");
    std::fs::write(&path, r#"scan_base = "nope""#).unwrap();

    let settings = Settings::load(&path).unwrap();
    assert!(settings.links().is_err());
  }

  #[test]
  fn tilde_is_expanded() {
    let expanded = expand_tilde(Path::new("~/x/oauth.json"));
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expanded, PathBuf::from(home).join("x/oauth.json"));
    }
    assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
  }
}
