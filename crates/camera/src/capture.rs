//! Camera capture widget
//!
//! ```text
//! Closed ──open──▶ Streaming ──capture──▶ Captured ──confirm──▶ Confirmed
//!                     ▲                      │
//!                     └───────retake─────────┘
//! any state ──cancel──▶ Cancelled
//! ```
//!
//! At most one stream is open. Every path out of Streaming/Captured other
//! than retake releases it.

use pawnshop_config::CameraConfig;
use pawnshop_core::{MediaDevice, Notifier, Severity};
use std::fmt;
use std::sync::Arc;

use crate::image::CapturedImage;
use crate::stream::StreamGuard;
use crate::CameraError;

/// Widget state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraState {
    #[default]
    Closed,
    Streaming,
    Captured,
    Confirmed,
    Cancelled,
}

impl CameraState {
    /// The camera modal is showing
    pub fn is_open(self) -> bool {
        matches!(self, CameraState::Streaming | CameraState::Captured)
    }
}

impl fmt::Display for CameraState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CameraState::Closed => "closed",
            CameraState::Streaming => "streaming",
            CameraState::Captured => "captured",
            CameraState::Confirmed => "confirmed",
            CameraState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Which parts of the widget are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraControls {
    pub video: bool,
    pub preview: bool,
    pub open_button: bool,
    pub capture_button: bool,
    pub retake_button: bool,
    pub confirm_button: bool,
}

impl CameraControls {
    pub fn for_state(state: CameraState) -> Self {
        let streaming = state == CameraState::Streaming;
        let captured = state == CameraState::Captured;
        Self {
            video: streaming,
            preview: captured,
            open_button: !state.is_open(),
            capture_button: streaming,
            retake_button: captured,
            confirm_button: captured,
        }
    }
}

/// Photo capture bound to one hidden form field
pub struct CameraCapture {
    device: Arc<dyn MediaDevice>,
    notifier: Arc<dyn Notifier>,
    config: CameraConfig,
    stream: StreamGuard,
    state: CameraState,
    image: Option<CapturedImage>,
    field_value: String,
}

impl CameraCapture {
    pub fn new(
        device: Arc<dyn MediaDevice>,
        notifier: Arc<dyn Notifier>,
        config: CameraConfig,
    ) -> Self {
        Self {
            device,
            notifier,
            config,
            stream: StreamGuard::default(),
            state: CameraState::Closed,
            image: None,
            field_value: String::new(),
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn controls(&self) -> CameraControls {
        CameraControls::for_state(self.state)
    }

    /// Name of the hidden field the data URI goes into
    pub fn field_name(&self) -> &str {
        &self.config.image_field
    }

    /// Hidden field value: a data URI, or empty
    pub fn field_value(&self) -> &str {
        &self.field_value
    }

    /// Image shown in the preview / held in the field
    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_active()
    }

    /// Request a stream from the device
    ///
    /// No-op while a stream is already open. On device failure the user is
    /// notified and the widget closes.
    pub async fn open(&mut self) -> Result<(), CameraError> {
        if self.stream.is_active() {
            tracing::debug!(state = %self.state, "Camera already open");
            return Ok(());
        }

        let constraints = self.config.constraints();
        match self.device.get_user_media(&constraints).await {
            Ok(stream) => {
                self.stream = StreamGuard::new(stream);
                self.state = CameraState::Streaming;
                tracing::info!(
                    width = constraints.ideal_width,
                    height = constraints.ideal_height,
                    "Camera opened"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Camera access failed");
                self.notifier.notify(
                    &format!("Unable to access camera: {}", e),
                    Severity::Error,
                );
                self.close();
                Err(CameraError::DeviceAccess(e))
            }
        }
    }

    /// Snapshot the current frame into the hidden field
    pub fn capture(&mut self) -> Result<&CapturedImage, CameraError> {
        let quality = self.config.jpeg_quality;
        let state = self.state;
        let stream = match (state, self.stream.stream_mut()) {
            (CameraState::Streaming, Some(stream)) => stream,
            _ => {
                return Err(CameraError::InvalidState {
                    action: "capture",
                    state,
                })
            }
        };

        let (width, height) = stream.frame_size();
        let bytes = match stream.snapshot_jpeg(width, height, quality) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Frame capture failed");
                self.notifier
                    .notify(&format!("Failed to capture photo: {}", e), Severity::Error);
                return Err(CameraError::Capture(e));
            }
        };

        tracing::debug!(width, height, bytes = bytes.len(), "Frame captured");
        let image = CapturedImage::jpeg(bytes);
        self.field_value = image.to_data_uri();
        self.state = CameraState::Captured;
        Ok(&*self.image.insert(image))
    }

    /// Discard the capture and go back to the live view
    pub fn retake(&mut self) -> Result<(), CameraError> {
        if self.state != CameraState::Captured {
            return Err(CameraError::InvalidState {
                action: "retake",
                state: self.state,
            });
        }
        self.clear_field();
        self.state = CameraState::Streaming;
        Ok(())
    }

    /// Keep the capture and close the camera
    pub fn confirm(&mut self) -> Result<&CapturedImage, CameraError> {
        let state = self.state;
        if state != CameraState::Captured {
            return Err(CameraError::InvalidState {
                action: "confirm",
                state,
            });
        }
        self.stream.release();
        self.state = CameraState::Confirmed;
        tracing::info!(field = %self.field_name(), "Photo confirmed");
        self.image.as_ref().ok_or(CameraError::InvalidState {
            action: "confirm",
            state,
        })
    }

    /// Drop any capture and close the camera
    pub fn cancel(&mut self) {
        self.clear_field();
        self.stream.release();
        self.state = CameraState::Cancelled;
    }

    /// Release the device
    ///
    /// Safe in any state and on repeat. The hidden field is left as is.
    pub fn close(&mut self) {
        self.stream.release();
        if self.state.is_open() {
            self.state = CameraState::Closed;
        }
    }

    fn clear_field(&mut self) {
        self.image = None;
        self.field_value.clear();
    }
}
