//! Loan form model
//!
//! Field values are kept exactly as typed; parsing happens on every
//! recalculation. Display panels hold typed view models rather than markup.

use pawnshop_core::GoldLimits;
use std::collections::HashMap;
use std::fmt;

use crate::display::{MetricsSummary, SchemePanel};

/// Help text under the scheme selector before anything is selected
pub const DEFAULT_SCHEME_HELP: &str =
    "Select a scheme to apply its interest rate, processing fee and duration.";

/// Loan form fields the shell reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Scheme,
    Principal,
    InterestRate,
    ProcessingFee,
    /// Written by the shell only
    DistributionAmount,
    IssueDate,
    DueDate,
    GracePeriodEnd,
    GoldMarketPrice,
    Karat,
    NetWeight,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Scheme,
        Field::Principal,
        Field::InterestRate,
        Field::ProcessingFee,
        Field::DistributionAmount,
        Field::IssueDate,
        Field::DueDate,
        Field::GracePeriodEnd,
        Field::GoldMarketPrice,
        Field::Karat,
        Field::NetWeight,
    ];

    /// Element id of the field on the loan page
    pub fn element_id(self) -> &'static str {
        match self {
            Field::Scheme => "id_scheme",
            Field::Principal => "id_principal_amount",
            Field::InterestRate => "id_interest_rate",
            Field::ProcessingFee => "id_processing_fee",
            Field::DistributionAmount => "id_distribution_amount",
            Field::IssueDate => "id_issue_date",
            Field::DueDate => "id_due_date",
            Field::GracePeriodEnd => "id_grace_period_end",
            Field::GoldMarketPrice => "id_gold_market_price",
            Field::Karat => "id_gold_karat",
            Field::NetWeight => "id_net_weight",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Field> {
        Self::ALL.into_iter().find(|f| f.element_id() == id)
    }

    pub fn is_write_only(self) -> bool {
        matches!(self, Field::DistributionAmount)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Loan form state: field values plus display containers
#[derive(Debug, Clone, PartialEq)]
pub struct LoanForm {
    values: HashMap<Field, String>,
    scheme_help: String,
    default_scheme_help: String,
    pub(crate) scheme_panel: SchemePanel,
    pub(crate) metrics: Option<MetricsSummary>,
    pub(crate) gold: Option<GoldLimits>,
}

impl Default for LoanForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanForm {
    pub fn new() -> Self {
        Self::with_scheme_help(DEFAULT_SCHEME_HELP)
    }

    /// Form whose scheme selector carries its own help text
    ///
    /// Whatever is given here is what clearing the selector restores.
    pub fn with_scheme_help(help: impl Into<String>) -> Self {
        let help = help.into();
        Self {
            values: HashMap::new(),
            scheme_help: help.clone(),
            default_scheme_help: help,
            scheme_panel: SchemePanel::Hidden,
            metrics: None,
            gold: None,
        }
    }

    /// Builder-style field prefill
    pub fn with_value(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Raw value of a field; blank if never set
    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self, field: Field) -> bool {
        self.value(field).trim().is_empty()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn scheme_help(&self) -> &str {
        &self.scheme_help
    }

    pub fn default_scheme_help(&self) -> &str {
        &self.default_scheme_help
    }

    pub(crate) fn set_scheme_help(&mut self, help: String) {
        self.scheme_help = help;
    }

    pub(crate) fn restore_scheme_help(&mut self) {
        self.scheme_help = self.default_scheme_help.clone();
    }

    pub fn scheme_panel(&self) -> &SchemePanel {
        &self.scheme_panel
    }

    pub fn metrics(&self) -> Option<&MetricsSummary> {
        self.metrics.as_ref()
    }

    pub fn gold_limits(&self) -> Option<&GoldLimits> {
        self.gold.as_ref()
    }
}
