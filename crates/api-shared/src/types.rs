use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Client-facing message for a stored upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Body of every `/upload` response, successful or not.
///
/// On failure `filename` is empty and `message` explains the rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadRes {
    /// Generated storage name, e.g. `0b5d4f4e-3c1a-4a8e-9f0e-5b7c2d1e6a90.png`
    pub filename: String,
    pub message: String,
}

impl UploadRes {
    pub fn stored(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            message: UPLOAD_SUCCESS_MESSAGE.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            filename: String::new(),
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_has_empty_filename() {
        let json = serde_json::to_value(UploadRes::rejected("Invalid or missing TOTP token")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"filename": "", "message": "Invalid or missing TOTP token"})
        );
    }

    #[test]
    fn test_stored_message() {
        let res = UploadRes::stored("abc.png");
        assert_eq!(res.filename, "abc.png");
        assert_eq!(res.message, "File uploaded successfully");
    }
}
