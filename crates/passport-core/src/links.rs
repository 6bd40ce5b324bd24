//! URL construction for scan links and passport images.

use url::Url;

use crate::{
  error::{Error, Result},
  passport::{PassportId, PassportSecret},
};

pub const DEFAULT_SCAN_BASE: &str = "https://id.purduehackers.com/scan";
pub const DEFAULT_IMAGE_BASE: &str = "https://data.passports.purduehackers.com";

/// Base locations the workflow and the detail view derive URLs from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
  scan_base:  Url,
  image_base: Url,
}

impl Links {
  pub fn new(scan_base: &str, image_base: &str) -> Result<Self> {
    Ok(Self {
      scan_base:  parse_base(scan_base)?,
      image_base: parse_base(image_base)?,
    })
  }

  pub fn scan_base(&self) -> &Url { &self.scan_base }

  pub fn image_base(&self) -> &Url { &self.image_base }

  /// `<scan-base>?id=<id>&secret=<secret>`, both values form-encoded.
  ///
  /// Any query already present on the scan base is replaced.
  pub fn activation_url(&self, id: PassportId, secret: &PassportSecret) -> Url {
    let mut url = self.scan_base.clone();
    url
      .query_pairs_mut()
      .clear()
      .append_pair("id", &id.to_string())
      .append_pair("secret", secret.expose());
    url
  }

  /// `<image-base>/<id>.png`
  pub fn image_url(&self, id: PassportId) -> Url {
    let mut url = self.image_base.clone();
    // `parse_base` rejects cannot-be-a-base URLs, so this always succeeds.
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push(&format!("{id}.png"));
    }
    url
  }
}

fn parse_base(raw: &str) -> Result<Url> {
  let url = Url::parse(raw)?;
  if url.cannot_be_a_base() {
    return Err(Error::OpaqueBaseUrl(raw.to_string()));
  }
  Ok(url)
}
