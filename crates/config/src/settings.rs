//! Main settings module

use config::{Config, Environment, File};
use pawnshop_core::{FacingMode, GoldValuationBasis, GoldValuator, LtvRatios, VideoConstraints};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{camera, loan, observability, schemes};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Where scheme snapshots come from
    #[serde(default)]
    pub schemes: SchemeEndpointConfig,

    /// Loan form defaults
    #[serde(default)]
    pub loan: LoanDefaults,

    /// Gold valuation
    #[serde(default)]
    pub gold: GoldConfig,

    /// Camera capture
    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Which URL layout the scheme endpoint uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemeApiStyle {
    /// `GET /schemes/{id}/json/`
    #[default]
    Current,
    /// `GET /api/schemes/{id}/`
    Legacy,
}

impl SchemeApiStyle {
    /// Path for a scheme id, relative to the base URL
    pub fn path(&self, scheme_id: &str) -> String {
        match self {
            Self::Current => format!("/schemes/{}/json/", scheme_id),
            Self::Legacy => format!("/api/schemes/{}/", scheme_id),
        }
    }
}

/// Scheme endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeEndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_style: SchemeApiStyle,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    schemes::BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    schemes::TIMEOUT_MS
}

impl Default for SchemeEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_style: SchemeApiStyle::default(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SchemeEndpointConfig {
    /// Full URL for a scheme id
    pub fn scheme_url(&self, scheme_id: &str) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_style.path(scheme_id)
        )
    }
}

/// Loan form defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanDefaults {
    /// Processing fee percent used when a scheme carries none
    #[serde(default = "default_processing_fee_percent")]
    pub processing_fee_percent: f64,

    /// Grace period used when a scheme carries none
    #[serde(default = "default_grace_period_days")]
    pub grace_period_days: u32,
}

fn default_processing_fee_percent() -> f64 {
    loan::PROCESSING_FEE_PERCENT
}

fn default_grace_period_days() -> u32 {
    loan::GRACE_PERIOD_DAYS
}

impl Default for LoanDefaults {
    fn default() -> Self {
        Self {
            processing_fee_percent: default_processing_fee_percent(),
            grace_period_days: default_grace_period_days(),
        }
    }
}

/// Gold valuation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoldConfig {
    /// How the entered market price is interpreted
    #[serde(default)]
    pub valuation_basis: GoldValuationBasis,

    #[serde(default)]
    pub ltv: LtvRatios,
}

impl GoldConfig {
    pub fn valuator(&self) -> GoldValuator {
        GoldValuator::new(self.valuation_basis).with_ratios(self.ltv)
    }
}

/// Camera capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,

    #[serde(default)]
    pub facing_mode: FacingMode,

    /// JPEG quality, 0.0–1.0
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: f32,

    /// Name of the hidden field receiving the image
    #[serde(default = "default_image_field")]
    pub image_field: String,
}

fn default_ideal_width() -> u32 {
    camera::IDEAL_WIDTH
}

fn default_ideal_height() -> u32 {
    camera::IDEAL_HEIGHT
}

fn default_jpeg_quality() -> f32 {
    camera::JPEG_QUALITY
}

fn default_image_field() -> String {
    camera::IMAGE_FIELD.to_string()
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            facing_mode: FacingMode::default(),
            jpeg_quality: default_jpeg_quality(),
            image_field: default_image_field(),
        }
    }
}

impl CameraConfig {
    pub fn constraints(&self) -> VideoConstraints {
        VideoConstraints {
            ideal_width: self.ideal_width,
            ideal_height: self.ideal_height,
            facing_mode: self.facing_mode,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    observability::LOG_LEVEL.to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_schemes()?;
        self.validate_loan()?;
        self.validate_gold()?;
        self.validate_camera()?;
        self.validate_observability()?;
        Ok(())
    }

    fn validate_schemes(&self) -> Result<(), ConfigError> {
        let url = &self.schemes.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "schemes.base_url",
                format!("Must be an http(s) URL, got {:?}", url),
            ));
        }

        if self.schemes.timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "schemes.timeout_ms",
                "Timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    fn validate_loan(&self) -> Result<(), ConfigError> {
        let fee = self.loan.processing_fee_percent;
        if !(0.0..=100.0).contains(&fee) {
            return Err(ConfigError::invalid(
                "loan.processing_fee_percent",
                format!("Must be between 0 and 100, got {}", fee),
            ));
        }
        Ok(())
    }

    fn validate_gold(&self) -> Result<(), ConfigError> {
        let ltv = &self.gold.ltv;
        for (field, value) in [
            ("gold.ltv.min", ltv.min),
            ("gold.ltv.suggested", ltv.suggested),
            ("gold.ltv.max", ltv.max),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::invalid(
                    field,
                    format!("Must be in (0.0, 1.0], got {}", value),
                ));
            }
        }

        if !(ltv.min <= ltv.suggested && ltv.suggested <= ltv.max) {
            return Err(ConfigError::invalid(
                "gold.ltv",
                format!(
                    "Expected min <= suggested <= max, got {} / {} / {}",
                    ltv.min, ltv.suggested, ltv.max
                ),
            ));
        }

        Ok(())
    }

    fn validate_camera(&self) -> Result<(), ConfigError> {
        if self.camera.ideal_width == 0 || self.camera.ideal_height == 0 {
            return Err(ConfigError::invalid(
                "camera.ideal_width",
                "Frame dimensions must be greater than 0",
            ));
        }

        let q = self.camera.jpeg_quality;
        if !(q > 0.0 && q <= 1.0) {
            return Err(ConfigError::invalid(
                "camera.jpeg_quality",
                format!("Must be in (0.0, 1.0], got {}", q),
            ));
        }

        if self.camera.image_field.trim().is_empty() {
            return Err(ConfigError::invalid(
                "camera.image_field",
                "Field name cannot be empty",
            ));
        }

        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        let level = self.observability.log_level.to_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid(
                "observability.log_level",
                format!("Unknown level {:?}", self.observability.log_level),
            ));
        }
        Ok(())
    }
}

/// Load settings from `config/` and the environment
///
/// Priority: env vars > config/{env}.* > config/default.* > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from a given config directory and the environment
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(
        File::with_name(&dir.join("default").to_string_lossy()).required(false),
    );

    if let Some(env_name) = env {
        builder = builder
            .add_source(File::with_name(&dir.join(env_name).to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("PAWNSHOP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        scheme_base_url = %settings.schemes.base_url,
        "Settings loaded"
    );

    Ok(settings)
}
