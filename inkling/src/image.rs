//! Image input types for the analyze-and-write operation.
//!
//! An [`ImageData`] carries a base64 payload plus the declared format, built
//! from raw bytes, a file on disk, or a browser-style `data:` URL.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Supported image formats for the inline image payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ImageFormat {
    /// JPEG format (default, matching the service's canonical declaration).
    #[default]
    Jpeg,
    /// PNG format.
    Png,
    /// GIF format.
    Gif,
    /// WebP format.
    Webp,
}

impl ImageFormat {
    /// Get the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// Detect format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Detect format from a MIME type string.
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Detect format from magic bytes (file signature).
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, 0x50, 0x4E, 0x47, ..] => Some(Self::Png),
            [0x47, 0x49, 0x46, 0x38, ..] => Some(Self::Gif),
            [0x52, 0x49, 0x46, 0x46, ..] if bytes.len() >= 12 && &bytes[8..12] == b"WEBP" => {
                Some(Self::Webp)
            }
            _ => None,
        }
    }
}

/// An image payload ready to be sent inline to the generative service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// Base64-encoded image bytes.
    data: String,
    /// Declared image format.
    format: ImageFormat,
}

impl ImageData {
    /// Create from raw image bytes with an explicit format.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], format: ImageFormat) -> Self {
        Self {
            data: BASE64.encode(bytes),
            format,
        }
    }

    /// Create from already-encoded base64 data.
    #[must_use]
    pub fn from_base64(data: impl Into<String>, format: ImageFormat) -> Self {
        Self {
            data: data.into(),
            format,
        }
    }

    /// Read an image file from disk.
    ///
    /// The format is detected from the file signature, falling back to the
    /// extension, falling back to JPEG (the declaration the original service
    /// layer always used).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let format = ImageFormat::from_magic_bytes(&bytes)
            .or_else(|| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .unwrap_or_default();
        Ok(Self::from_bytes(&bytes, format))
    }

    /// Parse a `data:<mime>;base64,<payload>` URL, the form produced by a
    /// browser file reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a base64 image data URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| Error::image("missing data: prefix"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::image("missing payload separator"))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::image("only base64 data URLs are supported"))?;
        let format = ImageFormat::from_mime_type(mime)
            .ok_or_else(|| Error::image(format!("unsupported image type: {mime}")))?;
        Ok(Self::from_base64(payload, format))
    }

    /// The base64 payload.
    #[must_use]
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    /// The declared format.
    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    /// The declared MIME type.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Render as a `data:` URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.data)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("bmp"), None);
    }

    #[test]
    fn format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_magic_bytes(&[0x00, 0x01]), None);
    }

    #[test]
    fn data_url_round_trip() {
        let image = ImageData::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ImageFormat::Jpeg);
        let url = image.to_data_url();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let parsed = ImageData::from_data_url(&url).unwrap();
        assert_eq!(parsed, image);
    }

    #[test]
    fn rejects_non_base64_data_url() {
        assert!(ImageData::from_data_url("data:image/png,rawbytes").is_err());
        assert!(ImageData::from_data_url("http://example.com/cat.png").is_err());
        assert!(ImageData::from_data_url("data:text/plain;base64,aGk=").is_err());
    }

    #[test]
    fn from_path_detects_format() {
        let dir = std::env::temp_dir();
        let path = dir.join("inkling_image_test.png");
        std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();

        let image = ImageData::from_path(&path).unwrap();
        assert_eq!(image.format(), ImageFormat::Png);

        std::fs::remove_file(&path).ok();
    }
}
