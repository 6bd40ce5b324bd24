//! Core types and the activation workflow for NFC passports.
//!
//! This crate is deliberately free of HTTP, filesystem and NFC dependencies.
//! Every external capability (tag writing, credential lookup, the remote
//! activation endpoint) is a trait; concrete implementations live in
//! `passport-client` and `passport-cli`.

pub mod activation;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod links;
pub mod outcome;
pub mod passport;
pub mod tag;
pub mod workflow;

pub use error::{Error, Result};
pub use outcome::ActivationOutcome;
pub use passport::{Passport, PassportId, PassportSecret};
pub use workflow::ActivationWorkflow;
