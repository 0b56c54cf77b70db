//! # API Shared
//!
//! Shared definitions for the intake HTTP surface.
//!
//! Contains:
//! - JSON wire types (`types` module)
//! - Shared services like `HealthService`
//! - The TOTP gate used in front of every upload
//!
//! Used by `api-rest` and by tooling that talks to the service.

pub mod auth;
pub mod health;
pub mod types;

pub use auth::{require_valid_token, Unauthorized};
pub use health::HealthService;
pub use types::*;
