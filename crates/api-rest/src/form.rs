//! Multipart extraction for `POST /upload`.
//!
//! The body is read exactly once. Fields are collected first and judged afterwards, so a
//! token read before the body broke off still decides the outcome first.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use intake_core::constants::{IMAGE_FIELD_NAME, TOKEN_FIELD_NAME};
use intake_files::IncomingFile;

/// What could be read from an upload form.
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    pub token: Option<String>,
    pub image: Option<IncomingFile>,
    /// The body limit was hit; whatever was read before is kept
    pub too_large: bool,
    /// The body broke off for another reason
    pub malformed: Option<String>,
}

impl UploadForm {
    fn interrupted(&mut self, e: MultipartError) {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            self.too_large = true;
        } else {
            self.malformed = Some(e.body_text());
        }
    }
}

/// Reads every field of `multipart` until the body ends or breaks off.
///
/// Unknown fields are skipped. Only the first `image` field is kept.
pub(crate) async fn read_upload_form(mut multipart: Multipart) -> UploadForm {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                form.interrupted(e);
                break;
            }
        };

        let name = field.name().unwrap_or_default().to_owned();
        if name == TOKEN_FIELD_NAME {
            match field.text().await {
                Ok(text) => form.token = Some(text),
                Err(e) => {
                    form.interrupted(e);
                    break;
                }
            }
        } else if name == IMAGE_FIELD_NAME && form.image.is_none() {
            let filename = field.file_name().unwrap_or_default().to_owned();
            match field.bytes().await {
                Ok(bytes) => form.image = Some(IncomingFile::new(filename, bytes.to_vec())),
                Err(e) => {
                    form.interrupted(e);
                    break;
                }
            }
        }
    }

    form
}
