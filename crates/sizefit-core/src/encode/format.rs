//! Output formats and their capabilities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether the encoder's quality parameter has any effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    /// Quality-tunable; the size search bisects over quality.
    Lossy,
    /// Quality is ignored; a single encode is all the search can do.
    Lossless,
}

/// Output format requested for a compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeFormat {
    #[default]
    Jpeg,
    Png,
}

/// Returned when a format name or MIME type is not one we can encode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported output format: {0}")]
pub struct UnsupportedFormat(pub String);

impl EncodeFormat {
    pub fn kind(self) -> FormatKind {
        match self {
            EncodeFormat::Jpeg => FormatKind::Lossy,
            EncodeFormat::Png => FormatKind::Lossless,
        }
    }

    pub fn is_lossless(self) -> bool {
        self.kind() == FormatKind::Lossless
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            EncodeFormat::Jpeg => "image/jpeg",
            EncodeFormat::Png => "image/png",
        }
    }

    /// File extension used when naming downloads.
    pub fn extension(self) -> &'static str {
        match self {
            EncodeFormat::Jpeg => "jpg",
            EncodeFormat::Png => "png",
        }
    }

    /// Parse a MIME type such as `image/jpeg`.
    pub fn from_mime(mime: &str) -> Result<Self, UnsupportedFormat> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(EncodeFormat::Jpeg),
            "image/png" => Ok(EncodeFormat::Png),
            other => Err(UnsupportedFormat(other.to_string())),
        }
    }
}

impl FromStr for EncodeFormat {
    type Err = UnsupportedFormat;

    /// Accepts a short name (`jpeg`, `jpg`, `png`) or a MIME type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(EncodeFormat::Jpeg),
            "png" => Ok(EncodeFormat::Png),
            other if other.contains('/') => Self::from_mime(other),
            other => Err(UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for EncodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeFormat::Jpeg => f.write_str("jpeg"),
            EncodeFormat::Png => f.write_str("png"),
        }
    }
}
