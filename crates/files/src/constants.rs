/// Media types accepted by the pipeline, as reported by content sniffing.
pub const ACCEPTED_MEDIA_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// Longest extension (without the dot) carried over from an original filename.
pub const MAX_EXTENSION_LEN: usize = 16;

/// Full PNG signature.
pub const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// GIF headers; the version is part of the signature.
pub const GIF_SIGNATURES: [&[u8]; 2] = [b"GIF87a", b"GIF89a"];

/// JPEG start-of-image marker followed by the next marker's prefix.
pub const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];
