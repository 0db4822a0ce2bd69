//! Media device capabilities for the camera widget

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MediaError;

/// Which camera to prefer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera
    #[default]
    Environment,
    /// Front camera
    User,
}

/// Video constraints passed to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing_mode: FacingMode,
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
            facing_mode: FacingMode::Environment,
        }
    }
}

/// A live video stream
///
/// Holds device tracks until [`MediaStream::stop_all_tracks`] is called.
pub trait MediaStream: Send {
    /// Current frame dimensions as delivered by the device
    fn frame_size(&self) -> (u32, u32);

    /// Draw the current frame at `width`×`height` and encode it as JPEG
    fn snapshot_jpeg(&mut self, width: u32, height: u32, quality: f32) -> Result<Vec<u8>, MediaError>;

    /// Number of tracks still live
    fn active_tracks(&self) -> usize;

    /// Stop every track. Must be safe to call repeatedly.
    fn stop_all_tracks(&mut self);
}

/// Grants video streams
#[async_trait]
pub trait MediaDevice: Send + Sync {
    async fn get_user_media(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Box<dyn MediaStream>, MediaError>;
}
