//! Photo payloads as self-describing data URIs
//!
//! A selected photo travels through the system as a
//! `data:<mimetype>;base64,<encoded_data>` string. This module owns the
//! encoding, the parser, and the local acceptance policy (image MIME type,
//! byte limit) applied before any network interaction.

use crate::{Error, Result};
use base64::Engine as _;
use std::fmt;

/// Largest photo accepted for upload, in decoded bytes.
pub const MAX_PHOTO_BYTES: usize = 4 * 1024 * 1024;

/// Sniff an image MIME type from the payload's magic bytes.
///
/// Returns `None` for anything that is not a recognized image format so
/// callers can refuse the file rather than guess.
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        _ => None,
    }
}

/// A validated `data:<mime>;base64,<payload>` photo descriptor.
///
/// Construction goes through [`PhotoDataUri::from_bytes`] or
/// [`PhotoDataUri::parse`], so a value of this type always carries a
/// non-empty MIME type and a decodable, non-empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDataUri {
    mime_type: String,
    data: String,
    decoded_len: usize,
}

impl PhotoDataUri {
    /// Encode raw photo bytes, sniffing the MIME type from magic bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::Validation("photo is empty".to_string()));
        }

        let mime_type = detect_image_mime(bytes).ok_or_else(|| {
            Error::Validation(format!(
                "unrecognized image format (first 4 bytes: {:02X?})",
                &bytes[..bytes.len().min(4)]
            ))
        })?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            decoded_len: bytes.len(),
        })
    }

    /// Parse a `data:<mime>;base64,<payload>` string.
    pub fn parse(input: &str) -> Result<Self> {
        let rest = input.strip_prefix("data:").ok_or_else(|| {
            Error::Validation("expected a data URI (missing 'data:' scheme)".to_string())
        })?;

        let (mime_type, data) = rest.split_once(";base64,").ok_or_else(|| {
            Error::Validation("expected ';base64,' between MIME type and payload".to_string())
        })?;

        if mime_type.is_empty() {
            return Err(Error::Validation("missing MIME type".to_string()));
        }
        if data.is_empty() {
            return Err(Error::Validation("empty Base64 payload".to_string()));
        }

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| Error::Validation(format!("invalid Base64 payload: {}", e)))?;
        if decoded.is_empty() {
            return Err(Error::Validation("photo is empty".to_string()));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
            decoded_len: decoded.len(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 body without the `data:` preamble.
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    /// Size of the photo in decoded bytes.
    pub fn decoded_len(&self) -> usize {
        self.decoded_len
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Render the canonical data-URI form.
    pub fn to_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

impl fmt::Display for PhotoDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}
