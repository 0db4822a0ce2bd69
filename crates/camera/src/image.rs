//! Captured images and their data URI form

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::CameraError;

/// Encoded image bytes plus the subtype from `image/<ext>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Vec<u8>,
    extension: String,
}

impl CapturedImage {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            extension: "jpeg".to_string(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn mime_type(&self) -> String {
        format!("image/{}", self.extension)
    }

    /// `data:image/<ext>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), BASE64.encode(&self.bytes))
    }

    /// Parse a base64 image data URI as posted by the capture form
    pub fn from_data_uri(uri: &str) -> Result<Self, CameraError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| CameraError::InvalidDataUri("missing data: prefix".to_string()))?;
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| CameraError::InvalidDataUri("not base64 encoded".to_string()))?;
        let extension = mime
            .strip_prefix("image/")
            .filter(|ext| !ext.is_empty())
            .ok_or_else(|| CameraError::InvalidDataUri(format!("not an image type: {}", mime)))?;

        let bytes = BASE64
            .decode(payload)
            .map_err(|e| CameraError::InvalidDataUri(e.to_string()))?;
        if bytes.is_empty() {
            return Err(CameraError::InvalidDataUri("empty payload".to_string()));
        }

        Ok(Self {
            bytes,
            extension: extension.to_string(),
        })
    }
}
