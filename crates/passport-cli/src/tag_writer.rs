//! Development stand-in for the platform NFC sheet.
//!
//! Asks for confirmation on the terminal, then writes the tag payload as JSON
//! to a file. Declining is treated as the user dismissing the NFC session.

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
  sync::Arc,
};

use passport_core::tag::{TagPayload, TagWriter, WriteResult};
use tracing::debug;

/// Yes/no confirmation before a write.
pub trait Prompt: Send + Sync + 'static {
  fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Reads `y`/`n` from stdin.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
  fn confirm(&self, question: &str) -> io::Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{question} [y/N] ")?;
    stderr.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "Yes"))
  }
}

/// Always answers with the stored value (`--yes`, tests).
pub struct FixedPrompt(pub bool);

impl Prompt for FixedPrompt {
  fn confirm(&self, _question: &str) -> io::Result<bool> { Ok(self.0) }
}

pub struct FileTagWriter<P> {
  path:   PathBuf,
  prompt: Arc<P>,
}

impl<P: Prompt> FileTagWriter<P> {
  pub fn new(path: impl Into<PathBuf>, prompt: P) -> Self {
    Self {
      path:   path.into(),
      prompt: Arc::new(prompt),
    }
  }
}

impl<P: Prompt> TagWriter for FileTagWriter<P> {
  async fn write_tag(&self, payload: &TagPayload) -> WriteResult {
    let prompt = Arc::clone(&self.prompt);
    let question = format!(
      "Hold passport {} near the reader. Write it to {}?",
      payload.id,
      self.path.display()
    );
    let confirmed =
      match tokio::task::spawn_blocking(move || prompt.confirm(&question)).await {
        Ok(Ok(confirmed)) => confirmed,
        Ok(Err(e)) => return WriteResult::Failed(format!("prompt failed: {e}")),
        Err(e) => return WriteResult::Failed(format!("prompt task failed: {e}")),
      };
    if !confirmed {
      return WriteResult::CanceledByUser;
    }

    let raw = match serde_json::to_vec_pretty(payload) {
      Ok(raw) => raw,
      Err(e) => return WriteResult::Failed(format!("encoding payload: {e}")),
    };
    match tokio::fs::write(&self.path, raw).await {
      Ok(()) => {
        debug!(path = %self.path.display(), "tag payload written");
        WriteResult::Written
      }
      Err(e) => WriteResult::Failed(format!(
        "writing {}: {e}",
        self.path.display()
      )),
    }
  }
}

#[cfg(test)]
mod tests {
  use passport_core::{
    PassportId, PassportSecret,
    links::{DEFAULT_IMAGE_BASE, DEFAULT_SCAN_BASE, Links},
  };

  use super::*;

  fn payload() -> TagPayload {
    let links = Links::new(DEFAULT_SCAN_BASE, DEFAULT_IMAGE_BASE).unwrap();
    let secret = PassportSecret::new("s3cret");
    TagPayload {
      url: links.activation_url(PassportId(12), &secret),
      id: PassportId(12),
      secret,
    }
  }

  #[tokio::test]
  async fn confirmed_write_lands_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tag.json");
    let writer = FileTagWriter::new(&path, FixedPrompt(true));

    assert_eq!(writer.write_tag(&payload()).await, WriteResult::Written);

    let written: TagPayload =
      serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(written, payload());
  }

  #[tokio::test]
  async fn declined_write_is_a_cancel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tag.json");
    let writer = FileTagWriter::new(&path, FixedPrompt(false));

    assert_eq!(writer.write_tag(&payload()).await, WriteResult::CanceledByUser);
    assert!(!path.exists());
  }

  #[tokio::test]
  async fn io_error_is_a_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tag.json");
    let writer = FileTagWriter::new(&path, FixedPrompt(true));

    assert!(matches!(
      writer.write_tag(&payload()).await,
      WriteResult::Failed(_)
    ));
  }
}
