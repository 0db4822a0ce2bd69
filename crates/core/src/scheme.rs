//! Lending scheme snapshot

use serde::{Deserialize, Serialize};

use crate::loan::processing_fee;
use crate::money::Rupees;

/// Scheme terms as fetched from the scheme endpoint
///
/// Immutable once fetched; the calculator keeps the latest one and derives
/// fees and dates from it without going back to the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeInfo {
    pub id: String,
    pub name: String,
    /// Annual interest rate (percent)
    pub interest_rate: f64,
    pub loan_duration_days: u32,
    /// Processing fee percentage; `None` means the configured default applies
    pub processing_fee_percentage: Option<f64>,
    /// Grace period after the due date; `None` means the configured default applies
    pub grace_period_days: Option<u32>,
    pub no_interest_period_days: u32,
    pub scheme_type: Option<String>,
    pub minimum_period_days: Option<u32>,
}

impl SchemeInfo {
    /// Scheme with the given terms and default conditions
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        interest_rate: f64,
        loan_duration_days: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            interest_rate,
            loan_duration_days,
            processing_fee_percentage: None,
            grace_period_days: None,
            no_interest_period_days: 0,
            scheme_type: None,
            minimum_period_days: None,
        }
    }

    pub fn with_processing_fee(mut self, percent: f64) -> Self {
        self.processing_fee_percentage = Some(percent);
        self
    }

    pub fn with_grace_period(mut self, days: u32) -> Self {
        self.grace_period_days = Some(days);
        self
    }

    pub fn with_no_interest_period(mut self, days: u32) -> Self {
        self.no_interest_period_days = days;
        self
    }

    pub fn with_scheme_type(mut self, scheme_type: impl Into<String>) -> Self {
        self.scheme_type = Some(scheme_type.into());
        self
    }

    /// Processing fee percentage, falling back to `default_percent`
    pub fn fee_percentage_or(&self, default_percent: f64) -> f64 {
        self.processing_fee_percentage.unwrap_or(default_percent)
    }

    /// Processing fee this scheme charges on `principal`
    pub fn processing_fee_for(&self, principal: Rupees, default_percent: f64) -> Rupees {
        processing_fee(principal, self.fee_percentage_or(default_percent))
    }

    /// Grace period in days, falling back to `default_days`
    pub fn grace_days_or(&self, default_days: u32) -> u32 {
        self.grace_period_days.unwrap_or(default_days)
    }

    pub fn has_no_interest_period(&self) -> bool {
        self.no_interest_period_days > 0
    }
}
