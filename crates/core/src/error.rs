#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("TOTP secret not found at {path}", path = path.display())]
    SecretNotFound { path: std::path::PathBuf },
    #[error("failed to read TOTP secret from {path}: {source}", path = path.display())]
    SecretRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create secret directory: {0}")]
    SecretDirCreation(std::io::Error),
    #[error("failed to write TOTP secret to {path}: {source}", path = path.display())]
    SecretWrite {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed TOTP secret: {0}")]
    MalformedSecret(String),
    #[error("failed to build TOTP verifier: {0}")]
    Totp(String),
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;
