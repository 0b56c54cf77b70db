//! Constants used throughout the intake core crate.
//!
//! Defaults for paths, limits and TOTP parameters live here so the server binary, the CLI
//! and the tests agree on them.

/// Default location of the persisted TOTP secret.
pub const DEFAULT_SECRET_FILE: &str = "totp_secret.txt";

/// Default directory for accepted uploads.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default listen address for the HTTP server.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8086";

/// Maximum accepted request body (and therefore file) size.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10 MiB

/// Multipart field carrying the one-time code.
pub const TOKEN_FIELD_NAME: &str = "totp_token";

/// Multipart field carrying the image.
pub const IMAGE_FIELD_NAME: &str = "image";

/// Number of digits in a one-time code.
pub const TOTP_DIGITS: usize = 6;

/// Length of one TOTP time step in seconds.
pub const TOTP_STEP_SECONDS: u64 = 30;

/// Adjacent steps accepted on either side of the current one.
pub const TOTP_DEFAULT_SKEW: u8 = 1;

/// Largest skew accepted from configuration.
pub const TOTP_MAX_SKEW: u8 = 2;

/// Issuer shown by authenticator apps.
pub const TOTP_ISSUER: &str = "FileUploadApp";

/// Account name shown by authenticator apps.
pub const TOTP_ACCOUNT_NAME: &str = "FileUploadApp";

/// Minimum secret length accepted by RFC 4226 (128 bits).
pub const MIN_SECRET_BYTES: usize = 16;
