//! Capabilities the impure shells depend on
//!
//! ```text
//! SchemeSource:  scheme id → SchemeInfo snapshot (HTTP in production)
//! Notifier:      (message, severity) user notification hook
//! MediaDevice:   video stream acquisition for the camera widget
//! MediaStream:   frame snapshots and track release
//! ```
//!
//! Each is injected into the shell that needs it so tests can swap in mocks.

mod media;
mod notifier;
mod schemes;

pub use media::{FacingMode, MediaDevice, MediaStream, VideoConstraints};
pub use notifier::{NoopNotifier, Notifier, Severity};
pub use schemes::SchemeSource;
