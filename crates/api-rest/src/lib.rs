//! # API REST
//!
//! REST API implementation for Intake.
//!
//! Handles:
//! - the TOTP-gated `POST /upload` endpoint
//! - the landing page, health check and OpenAPI document
//! - REST-specific concerns (multipart parsing, JSON responses, CORS, body limits)
//!
//! Uses `api-shared` for the response types and the token gate, `intake-files` for
//! validation and storage.

#![warn(rust_2018_idioms)]

mod error;
mod form;
mod page;
mod routes;
mod state;

pub use error::ApiError;
pub use page::render_landing_page;
pub use routes::{router, ApiDoc};
pub use state::{AppState, RestConfig};
