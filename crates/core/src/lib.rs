//! # Intake Core
//!
//! Core logic for the TOTP-gated image intake service:
//! - the shared TOTP secret and its one-time provisioning ([`SecretStore`])
//! - one-time code verification ([`TotpVerifier`])
//! - startup configuration ([`IntakeConfig`]) and shared constants
//!
//! **No API concerns**: HTTP routing, multipart parsing and response mapping belong in
//! `api-rest`; file validation and storage belong in `intake-files`.

pub mod config;
pub mod constants;
mod error;
pub mod secret;
pub mod totp;

pub use config::IntakeConfig;
pub use constants::{DEFAULT_LISTEN_ADDR, DEFAULT_SECRET_FILE, DEFAULT_UPLOAD_DIR, MAX_UPLOAD_BYTES};
pub use error::{IntakeError, IntakeResult};
pub use secret::{Provisioned, SecretStore, SharedSecret};
pub use totp::{TotpPolicy, TotpVerifier};
