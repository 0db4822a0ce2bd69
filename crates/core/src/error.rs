//! Error types for the capabilities the shells depend on
//!
//! The calculations themselves never fail: bad input is coerced to zero.
//! Only the external collaborators (scheme endpoint, camera) can.

use thiserror::Error;

/// Failure loading a scheme snapshot
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemeError {
    #[error("Scheme not found: {0}")]
    NotFound(String),

    #[error("Scheme endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Scheme request failed: {0}")]
    Request(String),

    #[error("Invalid scheme payload: {0}")]
    InvalidPayload(String),
}

impl SchemeError {
    /// HTTP status associated with the failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure talking to a media device
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    #[error("Frame capture failed: {0}")]
    Capture(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_error_status() {
        assert_eq!(SchemeError::NotFound("7".into()).status(), Some(404));
        assert_eq!(
            SchemeError::Status {
                status: 503,
                body: String::new()
            }
            .status(),
            Some(503)
        );
        assert_eq!(SchemeError::Request("timeout".into()).status(), None);
    }

    #[test]
    fn test_media_error_display() {
        let err = MediaError::PermissionDenied("NotAllowedError".into());
        assert_eq!(err.to_string(), "Camera permission denied: NotAllowedError");
    }
}
