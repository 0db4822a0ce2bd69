//! Scheme endpoint wire format
//!
//! Current endpoint (`/schemes/{id}/json/`):
//!
//! ```json
//! {
//!   "id": 3, "name": "Gold Plus", "interest_rate": 12.0, "loan_duration": 90,
//!   "additional_conditions": {
//!     "processing_fee_percentage": 1.5, "grace_period_days": 15,
//!     "no_interest_period_days": 0, "scheme_type": "standard"
//!   }
//! }
//! ```
//!
//! The legacy endpoint (`/api/schemes/{id}/`) puts `duration_days`,
//! `processing_fee_percentage` and `scheme_type` at the top level. Both shapes
//! are accepted; values under `additional_conditions` win.

use pawnshop_core::{parse_number, SchemeError, SchemeInfo};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A number the server may send either as JSON number or as decimal string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn value(&self) -> f64 {
        match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => parse_number(s),
        }
    }
}

/// Number from a JSON number or numeric text; anything else reads as absent
fn number_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if s.chars().any(|c| c.is_ascii_digit()) => parse_number(s),
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Whole days, rounded and clamped to the `u32` range
fn day_count(value: &Value) -> Option<u32> {
    number_value(value).map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32)
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Optional fields never fail the whole body; a value of the wrong shape is
// treated as missing.

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(number_value))
}

fn lenient_days<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(day_count))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(text_value))
}

fn lenient_conditions<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<AdditionalConditions>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

/// Scheme-specific conditions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdditionalConditions {
    #[serde(default, deserialize_with = "lenient_number")]
    pub processing_fee_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_days")]
    pub grace_period_days: Option<u32>,
    #[serde(default, deserialize_with = "lenient_days")]
    pub no_interest_period_days: Option<u32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub scheme_type: Option<String>,
}

/// Scheme JSON body
#[derive(Debug, Clone, Deserialize)]
pub struct SchemeResponse {
    #[serde(default)]
    id: Option<Value>,
    pub name: String,
    interest_rate: Numeric,
    #[serde(default)]
    pub loan_duration: Option<u32>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default, deserialize_with = "lenient_days")]
    pub minimum_period_days: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub processing_fee_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub scheme_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_conditions")]
    pub additional_conditions: Option<AdditionalConditions>,
}

impl SchemeResponse {
    /// Identifier carried in the body, if any
    pub fn id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate.value()
    }

    /// Convert into a scheme snapshot
    ///
    /// `requested_id` is used when the body carries no id of its own. A missing
    /// grace period stays `None` so the configured default applies later.
    pub fn into_scheme_info(self, requested_id: &str) -> Result<SchemeInfo, SchemeError> {
        let duration = self
            .loan_duration
            .or(self.duration_days)
            .ok_or_else(|| SchemeError::InvalidPayload("missing loan_duration".to_string()))?;

        let conditions = self.additional_conditions.clone().unwrap_or_default();

        Ok(SchemeInfo {
            id: self.id().unwrap_or_else(|| requested_id.to_string()),
            interest_rate: self.interest_rate(),
            name: self.name,
            loan_duration_days: duration,
            processing_fee_percentage: conditions
                .processing_fee_percentage
                .or(self.processing_fee_percentage),
            grace_period_days: conditions.grace_period_days,
            no_interest_period_days: conditions.no_interest_period_days.unwrap_or(0),
            scheme_type: conditions.scheme_type.or(self.scheme_type),
            minimum_period_days: self.minimum_period_days,
        })
    }
}
