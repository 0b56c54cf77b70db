//! Content sniffing.
//!
//! The type of an upload is decided from its leading bytes only. The client's content-type
//! header and filename are never consulted, so a text file renamed to `cat.png` is still
//! text.
//!
//! Acceptance requires the complete signature of each format. `infer` only reports what
//! rejected content looks like.

use crate::constants::{GIF_SIGNATURES, JPEG_SIGNATURE, PNG_SIGNATURE};
use serde::{Deserialize, Serialize};

/// Image formats the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Jpeg,
    Png,
    Gif,
}

impl ImageType {
    /// Classifies `bytes`, returning `None` for anything outside the allow-list.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_SIGNATURE) {
            Some(Self::Png)
        } else if GIF_SIGNATURES.iter().any(|sig| bytes.starts_with(sig)) {
            Some(Self::Gif)
        } else if bytes.starts_with(JPEG_SIGNATURE) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Best-effort media type of `bytes`, whatever it is. Used for diagnostics on rejection.
pub fn detect_media_type(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ACCEPTED_MEDIA_TYPES;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
    const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00";

    #[test]
    fn test_sniff_accepted_formats() {
        assert_eq!(ImageType::sniff(PNG), Some(ImageType::Png));
        assert_eq!(ImageType::sniff(JPEG), Some(ImageType::Jpeg));
        assert_eq!(ImageType::sniff(GIF), Some(ImageType::Gif));
        assert_eq!(ImageType::sniff(b"GIF87a\x01\x00"), Some(ImageType::Gif));
    }

    #[test]
    fn test_sniff_rejects_other_content() {
        assert_eq!(ImageType::sniff(b""), None);
        assert_eq!(ImageType::sniff(b"hello, world"), None);
        assert_eq!(ImageType::sniff(b"%PDF-1.7\n"), None);
        assert_eq!(ImageType::sniff(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"), None);
        assert_eq!(ImageType::sniff(&[0x50, 0x4B, 0x03, 0x04, 0, 0, 0, 0]), None);
    }

    #[test]
    fn test_sniff_requires_full_signature() {
        assert_eq!(ImageType::sniff(b"GIFT ideas for mum: flowers, tea"), None);
        assert_eq!(ImageType::sniff(b"GIF<script>alert(1)</script>"), None);
        assert_eq!(ImageType::sniff(b"\x89PNG but then plain text"), None);
        assert_eq!(ImageType::sniff(&PNG[..7]), None);
        assert_eq!(ImageType::sniff(&[0xFF, 0xD8]), None);
    }

    #[test]
    fn test_detect_media_type_reports_rejected_types() {
        assert_eq!(detect_media_type(b"%PDF-1.7\n"), Some("application/pdf"));
        assert_eq!(detect_media_type(b"plain"), None);
    }

    #[test]
    fn test_mime_types_match_allow_list() {
        for image in [ImageType::Jpeg, ImageType::Png, ImageType::Gif] {
            assert!(ACCEPTED_MEDIA_TYPES.contains(&image.mime_type()));
        }
    }
}
