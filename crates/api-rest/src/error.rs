use api_shared::auth::UNAUTHORIZED_MESSAGE;
use api_shared::{Unauthorized, UploadRes};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use intake_files::UploadError;

const TOO_BIG_MESSAGE: &str = "The uploaded file is too big.";
const MISSING_FILE_MESSAGE: &str = "Unable to retrieve file from form data.";
const UNSUPPORTED_MESSAGE: &str =
    "File format is not supported. Only JPEG, PNG, and GIF images are allowed.";
const MISSING_EXTENSION_MESSAGE: &str = "File does not have a valid extension.";
const DIRECTORY_MESSAGE: &str = "Unable to create upload directory.";
const SAVE_MESSAGE: &str = "Unable to save the file.";

/// Every way an upload request can fail.
///
/// Converts into a response with the matching status and a `{filename: "", message}` body.
/// The message is fixed per kind; underlying details only go to the log.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    Upload(UploadError),
    /// The blocking task running the pipeline did not complete
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Upload(e) => match e {
                UploadError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                UploadError::MissingFile(_)
                | UploadError::MalformedForm(_)
                | UploadError::UnsupportedMediaType { .. }
                | UploadError::MissingExtension(_) => StatusCode::BAD_REQUEST,
                // Only listing parses stored names; `accept` never returns this
                UploadError::InvalidStorageName(_) => StatusCode::INTERNAL_SERVER_ERROR,
                UploadError::DirectoryCreation { .. }
                | UploadError::Write { .. }
                | UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => UNAUTHORIZED_MESSAGE,
            ApiError::Upload(e) => match e {
                UploadError::PayloadTooLarge { .. } => TOO_BIG_MESSAGE,
                UploadError::MissingFile(_) | UploadError::MalformedForm(_) => MISSING_FILE_MESSAGE,
                UploadError::UnsupportedMediaType { .. } => UNSUPPORTED_MESSAGE,
                UploadError::MissingExtension(_) => MISSING_EXTENSION_MESSAGE,
                UploadError::DirectoryCreation { .. } => DIRECTORY_MESSAGE,
                UploadError::Write { .. }
                | UploadError::Io(_)
                | UploadError::InvalidStorageName(_) => SAVE_MESSAGE,
            },
            ApiError::Internal(_) => SAVE_MESSAGE,
        }
    }
}

impl From<Unauthorized> for ApiError {
    fn from(_: Unauthorized) -> Self {
        ApiError::Unauthorized
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        ApiError::Upload(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Unauthorized => tracing::warn!("Upload rejected: invalid or missing token"),
            ApiError::Upload(e) if status.is_server_error() => {
                tracing::error!("Upload failed: {}", e)
            }
            ApiError::Upload(e) => tracing::warn!("Upload rejected: {}", e),
            ApiError::Internal(detail) => tracing::error!("Upload task failed: {}", detail),
        }

        (status, Json(UploadRes::rejected(self.message()))).into_response()
    }
}
