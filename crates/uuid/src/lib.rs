//! Random storage identifiers.
//!
//! Every accepted upload is stored under a name whose stem is a freshly generated UUID. The
//! stem is never derived from anything the client sent, so the original filename cannot
//! influence where a file lands or collide with an earlier upload.
//!
//! This crate provides [`StorageId`], a small wrapper that *guarantees* the canonical
//! representation once constructed.
//!
//! ## Canonical form
//! - Length: 36
//! - Lowercase hex in the `8-4-4-4-12` hyphenated layout
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! This is the same value you would get from `Uuid::new_v4().hyphenated().to_string()`.
//! Identifiers read back from disk must already be canonical; [`StorageId::parse`] rejects
//! uppercase, simple (unhyphenated) and braced forms.

mod service;

pub use service::{StorageId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
