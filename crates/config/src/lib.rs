//! Configuration management for the loan widgets
//!
//! Supports loading configuration from:
//! - `config/default.{toml,yaml,json}`
//! - `config/{env}.{toml,yaml,json}`
//! - Environment variables (`PAWNSHOP__` prefix, `__` separator)
//!
//! Later sources override earlier ones; anything missing falls back to the
//! defaults in [`constants`].

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, CameraConfig, GoldConfig, LoanDefaults,
    ObservabilityConfig, RuntimeEnvironment, SchemeApiStyle, SchemeEndpointConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
