//! One-time code verification (RFC 6238, SHA-1, 6 digits, 30-second step).
//!
//! The verifier is built once at startup from the shared secret and is read-only
//! afterwards. It keeps no record of accepted codes, so a correct code can be reused until
//! its window closes.

use crate::constants::{
    TOTP_ACCOUNT_NAME, TOTP_DEFAULT_SKEW, TOTP_DIGITS, TOTP_ISSUER, TOTP_MAX_SKEW,
    TOTP_STEP_SECONDS,
};
use crate::secret::SharedSecret;
use crate::{IntakeError, IntakeResult};
use chrono::Utc;
use totp_rs::{Algorithm, TOTP};

/// Parameters of the TOTP scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TotpPolicy {
    digits: usize,
    step_seconds: u64,
    skew: u8,
}

impl Default for TotpPolicy {
    fn default() -> Self {
        Self {
            digits: TOTP_DIGITS,
            step_seconds: TOTP_STEP_SECONDS,
            skew: TOTP_DEFAULT_SKEW,
        }
    }
}

impl TotpPolicy {
    /// Standard policy with a custom drift tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidInput`] if `skew` exceeds the supported maximum.
    pub fn with_skew(skew: u8) -> IntakeResult<Self> {
        if skew > TOTP_MAX_SKEW {
            return Err(IntakeError::InvalidInput(format!(
                "TOTP skew must be between 0 and {}, got {}",
                TOTP_MAX_SKEW, skew
            )));
        }

        Ok(Self {
            skew,
            ..Self::default()
        })
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn step_seconds(&self) -> u64 {
        self.step_seconds
    }

    pub fn skew(&self) -> u8 {
        self.skew
    }
}

/// Checks submitted codes against the shared secret.
pub struct TotpVerifier {
    totp: TOTP,
    policy: TotpPolicy,
}

impl std::fmt::Debug for TotpVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TotpVerifier")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl TotpVerifier {
    /// Builds a verifier for `secret` under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Totp`] if the TOTP parameters are rejected (for example a
    /// secret shorter than 128 bits).
    pub fn new(secret: &SharedSecret, policy: TotpPolicy) -> IntakeResult<Self> {
        let totp = TOTP::new(
            Algorithm::SHA1,
            policy.digits,
            policy.skew,
            policy.step_seconds,
            secret.as_bytes().to_vec(),
            Some(TOTP_ISSUER.to_string()),
            TOTP_ACCOUNT_NAME.to_string(),
        )
        .map_err(|e| IntakeError::Totp(e.to_string()))?;

        Ok(Self { totp, policy })
    }

    pub fn policy(&self) -> &TotpPolicy {
        &self.policy
    }

    /// Returns true if `code` is valid now.
    pub fn validate(&self, code: &str) -> bool {
        self.validate_at(code, unix_now())
    }

    /// Returns true if `code` is valid at `unix_time`, allowing the configured skew.
    ///
    /// Codes of the wrong length or containing anything but ASCII digits are rejected
    /// before any HMAC is computed. Times inside the first `skew` steps after the epoch are
    /// checked as if at the end of that span, so the window never reaches before step 0.
    pub fn validate_at(&self, code: &str, unix_time: u64) -> bool {
        if !self.is_well_formed(code) {
            return false;
        }
        let earliest = u64::from(self.policy.skew) * self.policy.step_seconds;
        self.totp.check(code, unix_time.max(earliest))
    }

    /// The code for the step containing `unix_time`.
    pub fn code_at(&self, unix_time: u64) -> String {
        self.totp.generate(unix_time)
    }

    pub fn current_code(&self) -> String {
        self.code_at(unix_now())
    }

    /// `otpauth://` URI for enrolling an authenticator app.
    pub fn provisioning_url(&self) -> String {
        self.totp.get_url()
    }

    fn is_well_formed(&self, code: &str) -> bool {
        code.len() == self.policy.digits && code.bytes().all(|b| b.is_ascii_digit())
    }
}

fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
