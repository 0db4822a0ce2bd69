//! Default values for every setting
//!
//! Single source for the numbers the widgets fall back to when neither a
//! config file nor the environment provides one.

/// Scheme endpoint defaults
pub mod schemes {
    /// Base URL of the pawnshop web application
    pub const BASE_URL: &str = "http://127.0.0.1:8000";

    /// Request timeout for a scheme fetch
    pub const TIMEOUT_MS: u64 = 10_000;
}

/// Loan form defaults
pub mod loan {
    /// Processing fee (percent) when a scheme does not specify one
    pub const PROCESSING_FEE_PERCENT: f64 = 1.0;

    /// Grace period when a scheme does not specify one
    pub const GRACE_PERIOD_DAYS: u32 = pawnshop_core::DEFAULT_GRACE_DAYS;
}

/// Camera capture defaults
pub mod camera {
    pub const IDEAL_WIDTH: u32 = 1280;
    pub const IDEAL_HEIGHT: u32 = 720;

    /// JPEG quality for captured frames
    pub const JPEG_QUALITY: f32 = 0.9;

    /// Hidden form field receiving the data URI
    pub const IMAGE_FIELD: &str = "camera_image_data";
}

/// Logging defaults
pub mod observability {
    pub const LOG_LEVEL: &str = "info";
}
