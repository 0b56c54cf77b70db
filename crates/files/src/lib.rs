//! Intake File Storage
//!
//! This crate validates uploaded files and persists the accepted ones.
//!
//! ## Design Principles
//!
//! - The file type is decided by content sniffing, never by client metadata
//! - Only JPEG, PNG and GIF images are accepted
//! - Stored names are generated, never derived from the client's filename (only its
//!   extension is kept)
//! - Stored files are immutable; a failed write leaves nothing behind
//!
//! ## Storage Model
//!
//! A single flat directory:
//!
//! ```text
//! uploads/
//! ├── 0b5d4f4e-3c1a-4a8e-9f0e-5b7c2d1e6a90.png
//! └── 9e2f7c61-8d4b-4f3a-b2c5-1a6e0d9f8c37.jpg
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use intake_files::{IncomingFile, UploadPipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = UploadPipeline::new("uploads", 10 * 1024 * 1024);
//! let bytes = std::fs::read("photo.png")?;
//! let asset = pipeline.accept(IncomingFile::new("photo.png", bytes))?;
//! println!("stored as {}", asset.storage_name);
//! # Ok(())
//! # }
//! ```

mod constants;
mod name;
mod pipeline;
mod sniff;

pub use constants::{ACCEPTED_MEDIA_TYPES, MAX_EXTENSION_LEN};
pub use name::{extension_of, StorageName};
pub use pipeline::{IncomingFile, StoredFile, UploadPipeline, UploadedAsset};
pub use sniff::{detect_media_type, ImageType};

/// Errors that can occur while accepting or listing uploads
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Upload exceeds the configured size limit
    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    /// The form carried no file under the expected field
    #[error("no file under form field '{0}'")]
    MissingFile(String),

    /// The multipart body could not be parsed
    #[error("malformed multipart form: {0}")]
    MalformedForm(String),

    /// Sniffed content is not an accepted image type
    #[error("unsupported media type: {}", detected.unwrap_or("unknown"))]
    UnsupportedMediaType { detected: Option<&'static str> },

    /// The original filename has no usable extension
    #[error("file '{0}' does not have a valid extension")]
    MissingExtension(String),

    /// The storage directory could not be created
    #[error("failed to create upload directory {path}: {source}", path = path.display())]
    DirectoryCreation {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written
    #[error("failed to write {path}: {source}", path = path.display())]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A filename is not of the `<id><extension>` form
    #[error("not a storage name: {0}")]
    InvalidStorageName(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
