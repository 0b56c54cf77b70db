//! Upload validation and storage.
//!
//! [`UploadPipeline::accept`] takes a file already extracted from the request and runs the
//! checks in a fixed order:
//!
//! 1. size bound
//! 2. content sniffing (JPEG, PNG, GIF only)
//! 3. extension derivation from the original filename
//! 4. name generation
//! 5. persistence
//!
//! The first failing step decides the error. Nothing touches the disk before step 5, and a
//! failed write removes whatever was created, so a rejected upload never leaves a file
//! behind.

use crate::name::{extension_of, StorageName};
use crate::sniff::{detect_media_type, ImageType};
use crate::UploadError;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A file as received from the client.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    original_filename: String,
    bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn new(original_filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            original_filename: original_filename.into(),
            bytes,
        }
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An accepted and persisted upload.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadedAsset {
    /// Generated name the file is stored under
    pub storage_name: StorageName,

    /// Filename supplied by the client; only its extension was used
    pub original_filename: String,

    /// Type determined by sniffing
    pub media_type: ImageType,

    /// Size of the stored file in bytes
    pub size_bytes: u64,

    /// Hex SHA-256 digest of the stored bytes
    pub sha256: String,

    /// Location on disk
    pub path: PathBuf,

    /// UTC timestamp when the file was stored
    pub stored_at: DateTime<Utc>,
}

/// A previously stored file found in the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub storage_name: StorageName,
    pub size_bytes: u64,
}

/// Validates and stores uploads in a single flat directory.
///
/// The pipeline holds no mutable state; one instance can serve concurrent requests because
/// every accepted file gets its own freshly generated name.
#[derive(Debug, Clone)]
pub struct UploadPipeline {
    upload_dir: PathBuf,
    max_bytes: usize,
}

impl UploadPipeline {
    /// Creates a pipeline storing into `upload_dir` and accepting at most `max_bytes`.
    ///
    /// The directory is not touched until the first file is stored.
    pub fn new(upload_dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_bytes,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validates `file` and stores it under a generated name.
    ///
    /// # Errors
    ///
    /// - [`UploadError::PayloadTooLarge`] if the file exceeds the size limit
    /// - [`UploadError::UnsupportedMediaType`] if the content is not JPEG, PNG or GIF
    /// - [`UploadError::MissingExtension`] if the original filename has no usable extension
    /// - [`UploadError::DirectoryCreation`] / [`UploadError::Write`] on I/O failure
    pub fn accept(&self, file: IncomingFile) -> Result<UploadedAsset, UploadError> {
        let IncomingFile {
            original_filename,
            bytes,
        } = file;

        if bytes.len() > self.max_bytes {
            return Err(UploadError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }

        let media_type = ImageType::sniff(&bytes).ok_or_else(|| {
            UploadError::UnsupportedMediaType {
                detected: detect_media_type(&bytes),
            }
        })?;

        let storage_name = match extension_of(&original_filename) {
            Some(extension) => StorageName::generate(extension),
            None => return Err(UploadError::MissingExtension(original_filename)),
        };

        let path = self.persist(&storage_name, &bytes)?;

        Ok(UploadedAsset {
            storage_name,
            original_filename,
            media_type,
            size_bytes: bytes.len() as u64,
            sha256: hex::encode(Sha256::digest(&bytes)),
            path,
            stored_at: Utc::now(),
        })
    }

    /// Lists stored files, skipping anything whose name is not a storage name.
    ///
    /// A missing upload directory is treated as empty.
    pub fn list(&self) -> Result<Vec<StoredFile>, UploadError> {
        let entries = match fs::read_dir(&self.upload_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(UploadError::Io(e)),
        };

        let mut stored = Vec::new();
        for entry in entries {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };

            if let Ok(storage_name) = StorageName::parse(&name) {
                stored.push(StoredFile {
                    storage_name,
                    size_bytes: metadata.len(),
                });
            }
        }

        stored.sort_by_key(|f| f.storage_name.to_string());
        Ok(stored)
    }

    fn persist(&self, name: &StorageName, bytes: &[u8]) -> Result<PathBuf, UploadError> {
        fs::create_dir_all(&self.upload_dir).map_err(|source| UploadError::DirectoryCreation {
            path: self.upload_dir.clone(),
            source,
        })?;

        let path = self.upload_dir.join(name.to_string());

        // create_new: a generated name must never replace an existing file
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| UploadError::Write {
                path: path.clone(),
                source,
            })?;

        if let Err(source) = file.write_all(bytes).and_then(|()| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(UploadError::Write { path, source });
        }

        Ok(path)
    }
}
