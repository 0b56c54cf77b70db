//! Internal implementation of [`StorageId`].

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Byte offsets of the hyphens in the canonical layout.
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// Length of the canonical hyphenated form.
const CANONICAL_LEN: usize = 36;

/// A random storage identifier in canonical form (lowercase, hyphenated).
///
/// # Construction
/// - [`StorageId::new`] generates a fresh version 4 identifier from the OS random source.
/// - [`StorageId::parse`] validates an identifier read back from a stored filename.
///
/// # Display format
/// Always the 36-character lowercase hyphenated form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StorageId(Uuid);

impl Default for StorageId {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageId {
    /// Generates a new random identifier.
    ///
    /// Version 4 UUIDs carry 122 random bits, so collisions between independently generated
    /// identifiers are negligible for any realistic upload volume.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "storage id must be 36 lowercase hex characters in 8-4-4-4-12 form, got: '{}'",
                input
            )));
        }

        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid storage id '{}': {}", input, e)))
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// Purely syntactic: length, hyphen placement and lowercase hex digits.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == CANONICAL_LEN
            && input.bytes().enumerate().all(|(i, b)| {
                if HYPHEN_POSITIONS.contains(&i) {
                    b == b'-'
                } else {
                    matches!(b, b'0'..=b'9' | b'a'..=b'f')
                }
            })
    }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for StorageId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for StorageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StorageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StorageId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_generates_canonical_id() {
        let id = StorageId::new();
        let canonical = id.to_string();

        assert_eq!(canonical.len(), 36);
        assert!(StorageId::is_canonical(&canonical));
        assert_eq!(id.uuid().get_version_num(), 4);
    }

    #[test]
    fn test_parse_valid_canonical_id() {
        let canonical = "550e8400-e29b-41d4-a716-446655440000";
        let result = StorageId::parse(canonical);

        assert!(result.is_ok());
        assert_eq!(result.unwrap().to_string(), canonical);
    }

    #[test]
    fn test_parse_rejects_simple_form() {
        let simple = "550e8400e29b41d4a716446655440000";
        let result = StorageId::parse(simple);

        match result {
            Err(UuidError::InvalidInput(msg)) => {
                assert!(msg.contains("8-4-4-4-12"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_parse_rejects_uppercase() {
        assert!(StorageId::parse("550E8400-E29B-41D4-A716-446655440000").is_err());
    }

    #[test]
    fn test_parse_rejects_misplaced_hyphens() {
        assert!(StorageId::parse("550e840-0e29b-41d4-a716-446655440000").is_err());
    }

    #[test]
    fn test_parse_rejects_traversal_like_input() {
        assert!(StorageId::parse("../../../../etc/passwd-0000-0000-000").is_err());
    }

    #[test]
    fn test_from_str_matches_parse() {
        let canonical = "00000000-0000-4000-8000-000000000000";
        let parsed: StorageId = canonical.parse().unwrap();
        assert_eq!(parsed, StorageId::parse(canonical).unwrap());
    }

    #[test]
    fn test_ten_thousand_ids_are_distinct() {
        let ids: HashSet<StorageId> = (0..10_000).map(|_| StorageId::new()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_canonical_string() {
        let id = StorageId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");

        let back: StorageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<StorageId>("\"not-an-id\"").is_err());
    }
}
