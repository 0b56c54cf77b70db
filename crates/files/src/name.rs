//! Storage names.
//!
//! A storage name is `<id><extension>`: a freshly generated [`StorageId`] followed by the
//! extension of the client's original filename. Only the extension is taken from client
//! input, and it is restricted to a dot plus a short run of ASCII letters and digits, so a
//! storage name can never contain a path separator.

use crate::constants::MAX_EXTENSION_LEN;
use crate::UploadError;
use intake_uuid::StorageId;
use std::fmt;

/// Name under which an accepted upload is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageName {
    id: StorageId,
    extension: String,
}

impl StorageName {
    /// Allocates a new name with a fresh random identifier.
    ///
    /// `extension` must already have passed [`extension_of`] (leading dot included).
    pub fn generate(extension: &str) -> Self {
        Self {
            id: StorageId::new(),
            extension: extension.to_string(),
        }
    }

    /// Recognises a stored filename.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidStorageName`] if `name` is not a canonical identifier
    /// followed by a valid extension.
    pub fn parse(name: &str) -> Result<Self, UploadError> {
        let invalid = || UploadError::InvalidStorageName(name.to_string());

        let (stem, _) = name.split_once('.').ok_or_else(invalid)?;
        let id = StorageId::parse(stem).map_err(|_| invalid())?;
        let extension = &name[stem.len()..];
        if !is_valid_extension(extension) {
            return Err(invalid());
        }

        Ok(Self {
            id,
            extension: extension.to_string(),
        })
    }

    pub fn id(&self) -> &StorageId {
        &self.id
    }

    /// The extension including its leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl fmt::Display for StorageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.id, self.extension)
    }
}

impl serde::Serialize for StorageName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Extension of `original_filename`, leading dot included.
///
/// Only the last path segment is considered, with both `/` and `\` treated as separators.
/// The extension runs from the final dot to the end of that segment. Returns `None` when
/// there is no dot, nothing after it, or the suffix is not 1 to 16 ASCII letters and
/// digits. The extension is never inferred from the file content.
pub fn extension_of(original_filename: &str) -> Option<&str> {
    let segment = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_filename);
    let dot = segment.rfind('.')?;
    let extension = &segment[dot..];

    is_valid_extension(extension).then_some(extension)
}

fn is_valid_extension(extension: &str) -> bool {
    let Some(suffix) = extension.strip_prefix('.') else {
        return false;
    };

    !suffix.is_empty()
        && suffix.len() <= MAX_EXTENSION_LEN
        && suffix.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_extension_of_simple_names() {
        assert_eq!(extension_of("photo.png"), Some(".png"));
        assert_eq!(extension_of("IMG_0001.JPG"), Some(".JPG"));
        assert_eq!(extension_of("archive.tar.gif"), Some(".gif"));
        assert_eq!(extension_of(".gif"), Some(".gif"));
    }

    #[test]
    fn test_extension_of_rejects_missing_extension() {
        assert_eq!(extension_of(""), None);
        assert_eq!(extension_of("photo"), None);
        assert_eq!(extension_of("photo."), None);
        assert_eq!(extension_of("dir.d/photo"), None);
    }

    #[test]
    fn test_extension_of_uses_last_path_segment() {
        assert_eq!(extension_of("../../etc/passwd.png"), Some(".png"));
        assert_eq!(extension_of("C:\\Users\\me\\cat.gif"), Some(".gif"));
        assert_eq!(extension_of("a.png/.."), None);
    }

    #[test]
    fn test_extension_of_rejects_unsafe_suffixes() {
        assert_eq!(extension_of("photo.p ng"), None);
        assert_eq!(extension_of("photo.png;rm"), None);
        assert_eq!(extension_of("photo.pñg"), None);
        assert_eq!(extension_of("photo.abcdefghijklmnopq"), None);
        assert_eq!(extension_of("photo.abcdefghijklmnop"), Some(".abcdefghijklmnop"));
    }

    #[test]
    fn test_generate_formats_id_and_extension() {
        let name = StorageName::generate(".png");
        let text = name.to_string();

        assert_eq!(text.len(), 36 + 4);
        assert!(text.ends_with(".png"));
        assert!(StorageId::is_canonical(&text[..36]));
    }

    #[test]
    fn test_generated_names_are_distinct() {
        let names: HashSet<String> = (0..10_000)
            .map(|_| StorageName::generate(".png").to_string())
            .collect();
        assert_eq!(names.len(), 10_000);
    }

    #[test]
    fn test_parse_round_trips_generated_name() {
        let name = StorageName::generate(".jpeg");
        let parsed = StorageName::parse(&name.to_string()).unwrap();

        assert_eq!(parsed, name);
        assert_eq!(parsed.extension(), ".jpeg");
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        for name in [
            "photo.png",
            "550e8400-e29b-41d4-a716-446655440000",
            "550e8400-e29b-41d4-a716-446655440000.",
            "550e8400-e29b-41d4-a716-446655440000.tar.gz",
            "550E8400-E29B-41D4-A716-446655440000.png",
            ".png",
        ] {
            assert!(
                matches!(
                    StorageName::parse(name),
                    Err(UploadError::InvalidStorageName(_))
                ),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_serializes_as_string() {
        let name = StorageName::parse("550e8400-e29b-41d4-a716-446655440000.gif").unwrap();
        assert_eq!(
            serde_json::to_string(&name).unwrap(),
            "\"550e8400-e29b-41d4-a716-446655440000.gif\""
        );
    }
}
