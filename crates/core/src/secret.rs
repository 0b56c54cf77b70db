//! Shared TOTP secret and its on-disk record.
//!
//! The service holds exactly one secret. It is generated the first time the service starts,
//! written once with owner-only permissions, and read back verbatim on every later start.
//! Regenerating an existing secret would invalidate every enrolled authenticator, so
//! [`SecretStore`] never overwrites a record.

use crate::constants::MIN_SECRET_BYTES;
use crate::{IntakeError, IntakeResult};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use totp_rs::Secret;

/// The shared secret, kept both as its base32 text and as decoded bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret {
    encoded: String,
    bytes: Vec<u8>,
}

impl SharedSecret {
    /// Generates a fresh 160-bit secret from the OS random source.
    pub fn generate() -> IntakeResult<Self> {
        let secret = Secret::generate_secret();
        let bytes = secret
            .to_bytes()
            .map_err(|e| IntakeError::MalformedSecret(format!("{:?}", e)))?;

        Ok(Self {
            encoded: secret.to_encoded().to_string(),
            bytes,
        })
    }

    /// Parses a base32 secret as produced by standard TOTP key generation.
    ///
    /// Surrounding whitespace and trailing `=` padding are ignored and lowercase input is
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MalformedSecret`] if the text is empty, is not base32, or
    /// decodes to fewer than 128 bits.
    pub fn from_base32(input: &str) -> IntakeResult<Self> {
        let encoded = input.trim().trim_end_matches('=').to_ascii_uppercase();
        if encoded.is_empty() {
            return Err(IntakeError::MalformedSecret("secret is empty".into()));
        }

        let bytes = Secret::Encoded(encoded.clone())
            .to_bytes()
            .map_err(|_| IntakeError::MalformedSecret("secret is not valid base32".into()))?;

        if bytes.len() < MIN_SECRET_BYTES {
            return Err(IntakeError::MalformedSecret(format!(
                "secret is {} bits, at least {} required",
                bytes.len() * 8,
                MIN_SECRET_BYTES * 8
            )));
        }

        Ok(Self { encoded, bytes })
    }

    /// The base32 text, as stored on disk and entered into authenticator apps.
    pub fn as_base32(&self) -> &str {
        &self.encoded
    }

    /// The decoded key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret")
            .field("bits", &(self.bytes.len() * 8))
            .finish_non_exhaustive()
    }
}

/// Outcome of [`SecretStore::load_or_generate`].
#[derive(Debug, Clone)]
pub enum Provisioned {
    /// An existing record was read.
    Loaded(SharedSecret),
    /// No record existed; a new secret was generated and persisted.
    Generated(SharedSecret),
}

impl Provisioned {
    pub fn was_generated(&self) -> bool {
        matches!(self, Provisioned::Generated(_))
    }

    pub fn secret(&self) -> &SharedSecret {
        match self {
            Provisioned::Loaded(secret) | Provisioned::Generated(secret) => secret,
        }
    }

    pub fn into_secret(self) -> SharedSecret {
        match self {
            Provisioned::Loaded(secret) | Provisioned::Generated(secret) => secret,
        }
    }
}

/// File-backed store for the single shared secret.
#[derive(Clone, Debug)]
pub struct SecretStore {
    path: PathBuf,
}

impl SecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the secret record.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::SecretNotFound`] if no record exists
    /// - [`IntakeError::SecretRead`] if the record cannot be read
    /// - [`IntakeError::MalformedSecret`] if the record does not hold a usable secret
    pub fn load(&self) -> IntakeResult<SharedSecret> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => SharedSecret::from_base32(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(IntakeError::SecretNotFound {
                    path: self.path.clone(),
                })
            }
            Err(source) => Err(IntakeError::SecretRead {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Persists `secret` as a new record readable and writable by the owner only.
    ///
    /// The parent directory is created if missing. An existing record is never replaced.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::SecretDirCreation`] if the parent directory cannot be created
    /// - [`IntakeError::SecretWrite`] if the record already exists or cannot be written
    pub fn save(&self, secret: &SharedSecret) -> IntakeResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(IntakeError::SecretDirCreation)?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .map_err(|source| IntakeError::SecretWrite {
                path: self.path.clone(),
                source,
            })?;

        let written = file
            .write_all(secret.as_base32().as_bytes())
            .and_then(|()| file.sync_all());

        if let Err(source) = written {
            // An empty or truncated record would fail every later start.
            drop(file);
            let _ = fs::remove_file(&self.path);
            return Err(IntakeError::SecretWrite {
                path: self.path.clone(),
                source,
            });
        }

        Ok(())
    }

    /// Loads the existing secret, or generates and persists one if none exists.
    pub fn load_or_generate(&self) -> IntakeResult<Provisioned> {
        match self.load() {
            Ok(secret) => Ok(Provisioned::Loaded(secret)),
            Err(IntakeError::SecretNotFound { .. }) => {
                let secret = SharedSecret::generate()?;
                self.save(&secret)?;
                tracing::debug!("persisted new TOTP secret to {}", self.path.display());
                Ok(Provisioned::Generated(secret))
            }
            Err(e) => Err(e),
        }
    }
}
