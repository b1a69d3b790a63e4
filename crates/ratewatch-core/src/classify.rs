//! Document classification: MIME type from filename or leading bytes, and
//! decoding of the base64 payload.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{RateWatchError, Result};

const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];
const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

/// Document types the extraction endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MimeType {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Images carry no extractable text, so they never take the text paths.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }

    /// Parse a declared MIME type such as `"image/jpg"` or `"application/pdf; charset=binary"`.
    pub fn parse(declared: &str) -> Option<Self> {
        let essence = declared.split(';').next()?.trim().to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    fn from_extension(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    fn sniff(head: &[u8]) -> Option<Self> {
        if head.starts_with(&JPEG_MAGIC) {
            Some(Self::Jpeg)
        } else if head.starts_with(&PNG_MAGIC) {
            Some(Self::Png)
        } else {
            None
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a document by extension, then by leading bytes, defaulting to PDF.
pub fn detect_mime_type(filename: &str, head: Option<&[u8]>) -> MimeType {
    MimeType::from_extension(filename)
        .or_else(|| head.and_then(MimeType::sniff))
        .unwrap_or(MimeType::Pdf)
}

/// A decoded upload.
#[derive(Debug, Clone)]
pub struct DecodedContent {
    /// Raw document bytes.
    pub bytes: Vec<u8>,
    /// The base64 text without any data-URL prefix.
    pub base64: String,
    /// MIME type named by a data-URL prefix, if there was one.
    pub data_url_mime: Option<MimeType>,
}

/// Decode base64 content, accepting an optional `data:<mime>;base64,` prefix.
pub fn decode_content(content: &str) -> Result<DecodedContent> {
    let content = content.trim();
    let (data_url_mime, payload) = match content.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                RateWatchError::InvalidRequest("malformed data URL in content".to_string())
            })?;
            (MimeType::parse(header), payload)
        }
        None => (None, content),
    };

    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| RateWatchError::InvalidRequest(format!("content is not valid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(RateWatchError::InvalidRequest("content is empty".to_string()));
    }

    Ok(DecodedContent {
        bytes,
        base64: payload,
        data_url_mime,
    })
}

/// Encode raw bytes for the extraction endpoint.
pub fn encode_content(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEAD: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_HEAD: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn test_extension_wins_over_bytes() {
        assert_eq!(detect_mime_type("rates.png", Some(JPEG_HEAD)), MimeType::Png);
        assert_eq!(detect_mime_type("rates.JPG", Some(PNG_HEAD)), MimeType::Jpeg);
        assert_eq!(detect_mime_type("rates.jpeg", None), MimeType::Jpeg);
        assert_eq!(detect_mime_type("rates.pdf", Some(PNG_HEAD)), MimeType::Pdf);
    }

    #[test]
    fn test_sniff_without_extension() {
        assert_eq!(detect_mime_type("scan", Some(JPEG_HEAD)), MimeType::Jpeg);
        assert_eq!(detect_mime_type("scan", Some(PNG_HEAD)), MimeType::Png);
        assert_eq!(detect_mime_type("scan.bin", Some(b"%PDF-1.7")), MimeType::Pdf);
        assert_eq!(detect_mime_type("scan", Some(&[0xFF])), MimeType::Pdf);
        assert_eq!(detect_mime_type("scan", None), MimeType::Pdf);
    }

    #[test]
    fn test_parse_declared() {
        assert_eq!(MimeType::parse("image/jpg"), Some(MimeType::Jpeg));
        assert_eq!(MimeType::parse("Application/PDF; q=1"), Some(MimeType::Pdf));
        assert_eq!(MimeType::parse("text/plain"), None);
    }

    #[test]
    fn test_decode_plain_base64() {
        let decoded = decode_content(&encode_content(b"%PDF-1.4 test")).unwrap();
        assert_eq!(decoded.bytes, b"%PDF-1.4 test");
        assert!(decoded.data_url_mime.is_none());
    }

    #[test]
    fn test_decode_data_url() {
        let content = format!("data:image/png;base64,{}", encode_content(PNG_HEAD));
        let decoded = decode_content(&content).unwrap();
        assert_eq!(decoded.bytes, PNG_HEAD);
        assert_eq!(decoded.data_url_mime, Some(MimeType::Png));
        assert!(!decoded.base64.starts_with("data:"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_content("not base64 !!").is_err());
        assert!(decode_content("").is_err());
    }
}
