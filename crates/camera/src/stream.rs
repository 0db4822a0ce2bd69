//! Scoped ownership of a live media stream

use pawnshop_core::MediaStream;

/// Owns at most one stream and stops its tracks when released or dropped
#[derive(Default)]
pub struct StreamGuard {
    stream: Option<Box<dyn MediaStream>>,
}

impl StreamGuard {
    pub fn new(stream: Box<dyn MediaStream>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream_mut(&mut self) -> Option<&mut (dyn MediaStream + 'static)> {
        self.stream.as_deref_mut()
    }

    /// Stop every track and drop the stream
    ///
    /// Returns whether a stream was held. Safe to call any number of times.
    pub fn release(&mut self) -> bool {
        match self.stream.take() {
            Some(mut stream) => {
                let tracks = stream.active_tracks();
                stream.stop_all_tracks();
                tracing::debug!(tracks, "Camera stream released");
                true
            }
            None => false,
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StreamGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamGuard")
            .field("active", &self.is_active())
            .finish()
    }
}
