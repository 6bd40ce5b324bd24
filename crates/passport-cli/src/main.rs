//! `passport` — inspect and activate NFC passports from the terminal.
//!
//! # Usage
//!
//! ```
//! passport login --access-token <oauth-access-token>
//! passport show 12
//! passport activate 12
//! passport activate --file passport.json --yes
//! ```

mod settings;
mod tag_writer;
mod view;

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context as _, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use passport_client::{
  ApiClient, ApiConfig, FileCredentialStore, MemoryCredentialStore, OAuthRecord,
};
use passport_core::{
  ActivationOutcome, ActivationWorkflow, Passport, PassportId,
  credentials::{AccessToken, CredentialStore},
  tag::TagWriter,
};
use settings::Settings;
use tag_writer::{FileTagWriter, FixedPrompt, StdinPrompt};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "passport", version, about = "Write and activate NFC passports")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "passport.toml", value_name = "FILE")]
  config: PathBuf,

  /// Access token to use instead of the stored credentials.
  #[arg(long, env = "PASSPORT_TOKEN", hide_env_values = true, global = true)]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the passport detail view.
  Show {
    #[command(flatten)]
    source: PassportSource,

    /// Print the secret in plain text.
    #[arg(long)]
    reveal_secret: bool,
  },
  /// Write the passport to a tag and register it with the service.
  Activate {
    #[command(flatten)]
    source: PassportSource,

    /// Skip the confirmation prompt before writing.
    #[arg(short, long)]
    yes: bool,

    /// Print the outcome as JSON.
    #[arg(long)]
    json: bool,
  },
  /// Store an access token in the credentials file.
  Login {
    #[arg(long)]
    access_token: String,

    /// Seconds until the token expires.
    #[arg(long)]
    expires_in: Option<i64>,
  },
  /// Remove the stored credentials.
  Logout,
}

/// Where the passport record comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct PassportSource {
  /// Passport id to fetch from the service.
  id: Option<i64>,

  /// Read the passport record from a JSON file instead.
  #[arg(long, value_name = "FILE")]
  file: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;
  let file_store = FileCredentialStore::new(&settings.credentials_path);

  match cli.command {
    Command::Login {
      access_token,
      expires_in,
    } => {
      let mut record = OAuthRecord::new(AccessToken::new(access_token));
      record.expires_at = expires_in
        .map(|secs| expiry_after(chrono::Utc::now(), secs))
        .transpose()?;
      file_store
        .save(&record)
        .await
        .with_context(|| format!("saving {}", file_store.path().display()))?;
      println!("Signed in.");
      Ok(ExitCode::SUCCESS)
    }
    Command::Logout => {
      file_store.clear().await.context("removing stored credentials")?;
      println!("Signed out.");
      Ok(ExitCode::SUCCESS)
    }
    Command::Show {
      source,
      reveal_secret,
    } => match cli.token {
      Some(token) => {
        let creds = MemoryCredentialStore::new(Some(AccessToken::new(token)));
        show(&settings, &creds, &source, reveal_secret).await
      }
      None => show(&settings, &file_store, &source, reveal_secret).await,
    },
    Command::Activate { source, yes, json } => match cli.token {
      Some(token) => {
        let creds = MemoryCredentialStore::new(Some(AccessToken::new(token)));
        activate(&settings, &creds, &source, yes, json).await
      }
      None => activate(&settings, &file_store, &source, yes, json).await,
    },
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn show<C: CredentialStore>(
  settings: &Settings,
  creds: &C,
  source: &PassportSource,
  reveal_secret: bool,
) -> Result<ExitCode> {
  let links = settings.links()?;
  let passport = load_passport(settings, creds, source).await?;
  print!("{}", view::render_detail(&passport, &links, reveal_secret));
  Ok(ExitCode::SUCCESS)
}

async fn activate<C: CredentialStore>(
  settings: &Settings,
  creds: &C,
  source: &PassportSource,
  yes: bool,
  json: bool,
) -> Result<ExitCode> {
  let passport = load_passport(settings, creds, source).await?;
  if yes {
    let writer = FileTagWriter::new(&settings.tag_path, FixedPrompt(true));
    report(run_workflow(settings, writer, creds, &passport).await?, json)
  } else {
    let writer = FileTagWriter::new(&settings.tag_path, StdinPrompt);
    report(run_workflow(settings, writer, creds, &passport).await?, json)
  }
}

async fn run_workflow<W: TagWriter, C: CredentialStore>(
  settings: &Settings,
  writer: W,
  creds: &C,
  passport: &Passport,
) -> Result<ActivationOutcome> {
  let workflow =
    ActivationWorkflow::new(settings.links()?, writer, api_client(settings)?);
  Ok(workflow.run(passport, creds).await?)
}

fn report(outcome: ActivationOutcome, json: bool) -> Result<ExitCode> {
  if json {
    println!("{}", serde_json::to_string(&outcome)?);
  } else {
    println!("{}", view::render_outcome(&outcome));
  }

  Ok(match outcome {
    ActivationOutcome::Activated | ActivationOutcome::CanceledByUser => {
      ExitCode::SUCCESS
    }
    _ => ExitCode::FAILURE,
  })
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// `now + secs`, or an error when the result is not a representable time.
fn expiry_after(
  now: chrono::DateTime<chrono::Utc>,
  secs: i64,
) -> Result<chrono::DateTime<chrono::Utc>> {
  if secs <= 0 {
    return Err(anyhow!("--expires-in must be positive, got {secs}"));
  }
  chrono::TimeDelta::try_seconds(secs)
    .and_then(|delta| now.checked_add_signed(delta))
    .ok_or_else(|| anyhow!("--expires-in {secs} is too far in the future"))
}

fn api_client(settings: &Settings) -> Result<ApiClient> {
  ApiClient::new(ApiConfig {
    base_url: settings.api_base.clone(),
    timeout:  settings.http_timeout(),
  })
  .context("failed to build HTTP client")
}

async fn load_passport<C: CredentialStore>(
  settings: &Settings,
  creds: &C,
  source: &PassportSource,
) -> Result<Passport> {
  if let Some(path) = &source.file {
    let raw = tokio::fs::read(path)
      .await
      .with_context(|| format!("reading passport file {}", path.display()))?;
    return serde_json::from_slice(&raw).context("parsing passport file");
  }

  let id = source
    .id
    .map(PassportId)
    .ok_or_else(|| anyhow!("either a passport id or --file is required"))?;
  let token = creds
    .access_token()
    .await
    .context("reading stored credentials")?
    .ok_or_else(|| anyhow!("not signed in; run `passport login` or pass --token"))?;
  api_client(settings)?
    .get_passport(id, &token)
    .await
    .with_context(|| format!("fetching passport {id}"))
}
