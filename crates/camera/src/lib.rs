//! Camera capture
//!
//! Photographs pledged items into a hidden form field as a base64 JPEG data
//! URI. The device is injected through [`MediaDevice`](pawnshop_core::MediaDevice);
//! the open stream is owned by a guard that stops every track on release or
//! drop.

pub mod capture;
pub mod image;
pub mod stream;

pub use capture::{CameraCapture, CameraControls, CameraState};
pub use image::CapturedImage;
pub use stream::StreamGuard;

use pawnshop_core::MediaError;
use thiserror::Error;

/// Camera widget errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("Camera access failed: {0}")]
    DeviceAccess(MediaError),

    #[error("Capture failed: {0}")]
    Capture(MediaError),

    #[error("Cannot {action} while camera is {state}")]
    InvalidState {
        action: &'static str,
        state: CameraState,
    },

    #[error("Invalid image data URI: {0}")]
    InvalidDataUri(String),
}
