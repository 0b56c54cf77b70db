use intake_core::TotpVerifier;

/// Client-facing message for a missing or wrong one-time code.
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing TOTP token";

/// The request did not carry a currently valid one-time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unauthorized;

impl std::fmt::Display for Unauthorized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(UNAUTHORIZED_MESSAGE)
    }
}

impl std::error::Error for Unauthorized {}

/// Validates the provided one-time code against the shared secret.
///
/// Returns `Ok(())` if the code is valid now, or [`Unauthorized`] if it is absent, empty or
/// wrong.
pub fn require_valid_token(verifier: &TotpVerifier, token: Option<&str>) -> Result<(), Unauthorized> {
    match token {
        Some(code) if !code.is_empty() && verifier.validate(code) => Ok(()),
        _ => Err(Unauthorized),
    }
}
