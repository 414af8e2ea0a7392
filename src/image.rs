//! Input image loading and validation.
//!
//! Files are sniffed by magic bytes (JPEG, PNG, WebP), size-capped, and
//! encoded as the base64 data URI the provider expects. Everything here runs
//! before any network call, so failures surface as validation errors.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::RecolorError;

/// Upload cap, matching the product limit of 10 MiB.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Sniff the format from the leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(ImageFormat::Png)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }
}

/// Validate raw image bytes and encode them as a base64 data URI.
pub fn encode_data_uri(bytes: &[u8]) -> Result<String, RecolorError> {
    if bytes.is_empty() {
        return Err(RecolorError::Validation("input image is empty".into()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(RecolorError::Validation(format!(
            "image is {} bytes, the limit is {MAX_IMAGE_BYTES}",
            bytes.len()
        )));
    }
    let format = ImageFormat::sniff(bytes).ok_or_else(|| {
        RecolorError::Validation("unsupported image format, expected JPEG, PNG or WebP".into())
    })?;
    Ok(format!(
        "data:{};base64,{}",
        format.mime_type(),
        STANDARD.encode(bytes)
    ))
}

/// Read an image file from disk and encode it as a data URI.
pub fn load_data_uri(path: &Path) -> Result<String, RecolorError> {
    let bytes = std::fs::read(path)?;
    encode_data_uri(&bytes)
}
