//! Google Drive file access
//!
//! Downloads attachment files and understands just enough of their bytes to
//! size images for the archive document. Attachment cells hold sharing URLs,
//! not bare file IDs, so the store-internal ID is pattern-extracted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;

const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3/files";
const USER_AGENT: &str = "evishare/0.1";

/// Drive file IDs are 25+ character word/dash tokens embedded in sharing URLs.
static FILE_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\w]{25,}").expect("valid file id pattern"));

/// Drive client errors
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),
}

/// Google Drive API client
pub struct GoogleDriveClient {
    http_client: reqwest::Client,
    token: String,
}

impl GoogleDriveClient {
    pub fn new(token: String) -> Result<Self, DriveError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DriveError::NetworkError(e.to_string()))?;

        Ok(Self { http_client, token })
    }

    /// Download a file's content bytes.
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>, DriveError> {
        let url = format!("{}/{}", DRIVE_BASE_URL, file_id);

        tracing::debug!(file_id = file_id, "Downloading attachment");

        let response = self
            .http_client
            .get(&url)
            .query(&[("alt", "media")])
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| DriveError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DriveError::ApiError(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DriveError::NetworkError(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

/// Pull the Drive file ID out of an attachment URL. First match wins.
pub fn extract_file_id(url: &str) -> Option<String> {
    FILE_ID_PATTERN.find(url).map(|m| m.as_str().to_string())
}

/// Public content URI for a Drive file, usable as an inline image source.
pub fn content_uri(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=view&id={}", file_id)
}

/// Natural pixel dimensions (width, height) of an image file, if the format
/// is recognized.
pub fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let kind = infer::get(bytes)?;
    match kind.mime_type() {
        "image/png" => png_dimensions(bytes),
        "image/jpeg" => jpeg_dimensions(bytes),
        "image/gif" => gif_dimensions(bytes),
        _ => None,
    }
}

fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    // 8-byte signature, then IHDR: length(4) "IHDR"(4) width(4) height(4)
    if bytes.len() < 24 {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}

fn gif_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    // 6-byte header, then logical screen width/height as little-endian u16
    if bytes.len() < 10 {
        return None;
    }
    let width = u32::from(u16::from_le_bytes(bytes[6..8].try_into().ok()?));
    let height = u32::from(u16::from_le_bytes(bytes[8..10].try_into().ok()?));
    Some((width, height))
}

fn jpeg_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    // Walk the segment chain until a start-of-frame carries the dimensions
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
        return None;
    }
    let mut i = 2;
    while i + 3 < bytes.len() {
        if bytes[i] != 0xFF {
            return None;
        }
        let mut marker_pos = i + 1;
        while marker_pos < bytes.len() && bytes[marker_pos] == 0xFF {
            marker_pos += 1;
        }
        let marker = *bytes.get(marker_pos)?;
        i = marker_pos + 1;
        match marker {
            // standalone markers carry no length field
            0x01 | 0xD0..=0xD7 => continue,
            // end of image without a frame header
            0xD9 => return None,
            // SOF0..SOF15 minus DHT (C4), JPG (C8), DAC (CC)
            0xC0..=0xCF if marker != 0xC4 && marker != 0xC8 && marker != 0xCC => {
                // length(2) precision(1) height(2) width(2)
                if i + 7 > bytes.len() {
                    return None;
                }
                let height = (u32::from(bytes[i + 3]) << 8) | u32::from(bytes[i + 4]);
                let width = (u32::from(bytes[i + 5]) << 8) | u32::from(bytes[i + 6]);
                return Some((width, height));
            }
            _ => {
                if i + 1 >= bytes.len() {
                    return None;
                }
                let len = (usize::from(bytes[i]) << 8) | usize::from(bytes[i + 1]);
                if len < 2 {
                    return None;
                }
                i += len;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_file_id_from_open_url() {
        let url = "https://drive.google.com/open?id=1A2b3C4d5E6f7G8h9I0jKlMnOpQrStUvW";
        assert_eq!(
            extract_file_id(url),
            Some("1A2b3C4d5E6f7G8h9I0jKlMnOpQrStUvW".to_string())
        );
    }

    #[test]
    fn test_extract_file_id_from_file_path_url() {
        let url = "https://drive.google.com/file/d/1-aB_c2D3e4F5g6H7i8J9k0LmNoPqRs/view";
        assert_eq!(
            extract_file_id(url),
            Some("1-aB_c2D3e4F5g6H7i8J9k0LmNoPqRs".to_string())
        );
    }

    #[test]
    fn test_extract_file_id_rejects_short_tokens() {
        assert_eq!(extract_file_id("https://example.com/short?id=abc123"), None);
    }

    #[test]
    fn test_content_uri() {
        assert_eq!(
            content_uri("abc"),
            "https://drive.google.com/uc?export=view&id=abc"
        );
    }

    #[test]
    fn test_png_dimensions() {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D]); // IHDR length
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&800u32.to_be_bytes());
        bytes.extend_from_slice(&600u32.to_be_bytes());
        assert_eq!(probe_dimensions(&bytes), Some((800, 600)));
    }

    #[test]
    fn test_gif_dimensions() {
        let mut bytes = b"GIF89a".to_vec();
        bytes.extend_from_slice(&800u16.to_le_bytes());
        bytes.extend_from_slice(&600u16.to_le_bytes());
        assert_eq!(probe_dimensions(&bytes), Some((800, 600)));
    }

    #[test]
    fn test_jpeg_dimensions() {
        // SOI, APP0 (16-byte segment), SOF0 with 800x600
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        bytes.extend_from_slice(&[0u8; 14]);
        bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08, 0x02, 0x58, 0x03, 0x20]);
        assert_eq!(probe_dimensions(&bytes), Some((800, 600)));
    }

    #[test]
    fn test_probe_dimensions_unknown_format() {
        assert_eq!(probe_dimensions(b"not an image at all"), None);
    }
}
