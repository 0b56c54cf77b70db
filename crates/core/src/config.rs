//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services.
//! Nothing in the request path reads environment variables. The `*_from_env_value` helpers
//! take the raw value so binaries and tests can share the parsing rules without touching
//! process-wide state.

use crate::constants::{DEFAULT_SECRET_FILE, DEFAULT_UPLOAD_DIR};
use crate::totp::TotpPolicy;
use crate::{IntakeError, IntakeResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct IntakeConfig {
    secret_file: PathBuf,
    upload_dir: PathBuf,
    max_upload_bytes: usize,
    totp_policy: TotpPolicy,
}

impl IntakeConfig {
    /// Create a new `IntakeConfig`.
    pub fn new(
        secret_file: PathBuf,
        upload_dir: PathBuf,
        max_upload_bytes: usize,
        totp_policy: TotpPolicy,
    ) -> IntakeResult<Self> {
        if secret_file.as_os_str().is_empty() {
            return Err(IntakeError::InvalidInput(
                "secret file path cannot be empty".into(),
            ));
        }

        if upload_dir.as_os_str().is_empty() {
            return Err(IntakeError::InvalidInput(
                "upload directory cannot be empty".into(),
            ));
        }

        if max_upload_bytes == 0 {
            return Err(IntakeError::InvalidInput(
                "max upload size must be greater than zero".into(),
            ));
        }

        Ok(Self {
            secret_file,
            upload_dir,
            max_upload_bytes,
            totp_policy,
        })
    }

    pub fn secret_file(&self) -> &Path {
        &self.secret_file
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn totp_policy(&self) -> &TotpPolicy {
        &self.totp_policy
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Secret file path from an optional value, falling back to the default.
pub fn secret_file_from_env_value(value: Option<String>) -> PathBuf {
    PathBuf::from(non_empty(value).unwrap_or_else(|| DEFAULT_SECRET_FILE.into()))
}

/// Upload directory from an optional value, falling back to the default.
pub fn upload_dir_from_env_value(value: Option<String>) -> PathBuf {
    PathBuf::from(non_empty(value).unwrap_or_else(|| DEFAULT_UPLOAD_DIR.into()))
}

/// TOTP policy from an optional skew value.
///
/// If `value` is `None` or empty/whitespace, returns the default policy.
pub fn totp_policy_from_env_value(value: Option<String>) -> IntakeResult<TotpPolicy> {
    match non_empty(value) {
        None => Ok(TotpPolicy::default()),
        Some(v) => {
            let skew = v.parse::<u8>().map_err(|_| {
                IntakeError::InvalidInput(format!("TOTP skew must be a small integer, got '{}'", v))
            })?;
            TotpPolicy::with_skew(skew)
        }
    }
}

/// Boolean switch from an optional value.
///
/// Accepts `true/false`, `1/0`, `yes/no` and `on/off` in any case. `None` or an empty value
/// yields `default`.
pub fn flag_from_env_value(name: &str, value: Option<String>, default: bool) -> IntakeResult<bool> {
    let Some(v) = non_empty(value) else {
        return Ok(default);
    };

    match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(IntakeError::InvalidInput(format!(
            "{} must be a boolean, got '{}'",
            name, v
        ))),
    }
}

/// Optional free-form value; empty or whitespace means unset.
pub fn optional_from_env_value(value: Option<String>) -> Option<String> {
    non_empty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_UPLOAD_BYTES;

    #[test]
    fn test_new_rejects_empty_paths() {
        let policy = TotpPolicy::default();
        assert!(IntakeConfig::new(
            PathBuf::new(),
            PathBuf::from("uploads"),
            MAX_UPLOAD_BYTES,
            policy.clone()
        )
        .is_err());
        assert!(IntakeConfig::new(
            PathBuf::from("totp_secret.txt"),
            PathBuf::new(),
            MAX_UPLOAD_BYTES,
            policy
        )
        .is_err());
    }

    #[test]
    fn test_new_rejects_zero_limit() {
        let result = IntakeConfig::new(
            PathBuf::from("totp_secret.txt"),
            PathBuf::from("uploads"),
            0,
            TotpPolicy::default(),
        );
        assert!(matches!(result, Err(IntakeError::InvalidInput(_))));
    }

    #[test]
    fn test_paths_fall_back_to_defaults() {
        assert_eq!(
            secret_file_from_env_value(None),
            PathBuf::from("totp_secret.txt")
        );
        assert_eq!(
            secret_file_from_env_value(Some("  ".into())),
            PathBuf::from("totp_secret.txt")
        );
        assert_eq!(
            secret_file_from_env_value(Some("secrets/totp_secret".into())),
            PathBuf::from("secrets/totp_secret")
        );
        assert_eq!(upload_dir_from_env_value(None), PathBuf::from("uploads"));
    }

    #[test]
    fn test_totp_policy_from_env_value() {
        assert_eq!(totp_policy_from_env_value(None).unwrap().skew(), 1);
        assert_eq!(
            totp_policy_from_env_value(Some("0".into())).unwrap().skew(),
            0
        );
        assert!(totp_policy_from_env_value(Some("5".into())).is_err());
        assert!(totp_policy_from_env_value(Some("-1".into())).is_err());
        assert!(totp_policy_from_env_value(Some("one".into())).is_err());
    }

    #[test]
    fn test_flag_from_env_value() {
        assert!(flag_from_env_value("X", None, true).unwrap());
        assert!(!flag_from_env_value("X", Some("".into()), false).unwrap());
        assert!(flag_from_env_value("X", Some("TRUE".into()), false).unwrap());
        assert!(flag_from_env_value("X", Some("on".into()), false).unwrap());
        assert!(!flag_from_env_value("X", Some("0".into()), true).unwrap());

        match flag_from_env_value("INTAKE_CORS", Some("maybe".into()), false) {
            Err(IntakeError::InvalidInput(msg)) => assert!(msg.contains("INTAKE_CORS")),
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_from_env_value() {
        assert_eq!(optional_from_env_value(None), None);
        assert_eq!(optional_from_env_value(Some(" ".into())), None);
        assert_eq!(
            optional_from_env_value(Some(" https://img.example.com ".into())),
            Some("https://img.example.com".into())
        );
    }
}
