//! Concrete collaborators for the passport activation workflow.
//!
//! - [`ApiClient`]: async HTTP client for the passport service, and the
//!   production [`passport_core::activation::ActivationService`].
//! - [`FileCredentialStore`] / [`MemoryCredentialStore`]: access-token lookup.

pub mod api;
pub mod credentials;
pub mod error;

pub use api::{ApiClient, ApiConfig};
pub use credentials::{FileCredentialStore, MemoryCredentialStore, OAuthRecord};
pub use error::{ClientError, Result};
