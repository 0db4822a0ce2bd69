//! Display panels
//!
//! View models for the scheme details box and the calculation summary. Each
//! renders as plain labelled lines through `Display`.

use chrono::NaiveDate;
use pawnshop_core::{
    format_date, format_inr, format_percent, GoldLimits, LoanMetrics, MaturityDates,
    MaturityStatement, SchemeInfo,
};
use std::fmt;

use crate::calculator::CalculatorOptions;

/// Shown in the scheme panel when a fetch fails
pub const SCHEME_LOAD_ERROR: &str =
    "Failed to load scheme details. Please try again or contact support.";

/// Scheme details container
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemePanel {
    #[default]
    Hidden,
    Details(SchemeSummary),
    Error(String),
}

impl SchemePanel {
    pub fn is_visible(&self) -> bool {
        !matches!(self, SchemePanel::Hidden)
    }

    pub fn details(&self) -> Option<&SchemeSummary> {
        match self {
            SchemePanel::Details(summary) => Some(summary),
            _ => None,
        }
    }
}

impl fmt::Display for SchemePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemePanel::Hidden => Ok(()),
            SchemePanel::Details(summary) => summary.fmt(f),
            SchemePanel::Error(message) => f.write_str(message),
        }
    }
}

/// What the scheme details box shows for a loaded scheme
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeSummary {
    pub name: String,
    pub scheme_type: Option<String>,
    pub interest_rate: f64,
    pub processing_fee_percent: f64,
    pub duration_days: u32,
    pub minimum_period_days: Option<u32>,
    pub grace_period_days: u32,
    pub no_interest_period_days: u32,
    pub expected_maturity: Option<NaiveDate>,
}

impl SchemeSummary {
    pub fn new(
        scheme: &SchemeInfo,
        options: &CalculatorOptions,
        dates: Option<MaturityDates>,
    ) -> Self {
        Self {
            name: scheme.name.clone(),
            scheme_type: scheme.scheme_type.clone(),
            interest_rate: scheme.interest_rate,
            processing_fee_percent: scheme.fee_percentage_or(options.default_fee_percent),
            duration_days: scheme.loan_duration_days,
            minimum_period_days: scheme.minimum_period_days,
            grace_period_days: scheme.grace_days_or(options.default_grace_days),
            no_interest_period_days: scheme.no_interest_period_days,
            expected_maturity: dates.map(|d| d.due_date),
        }
    }

    /// One-line hint for under the scheme selector
    pub fn help_text(&self) -> String {
        format!(
            "{}: {} p.a. for {} days",
            self.name,
            format_percent(self.interest_rate),
            self.duration_days
        )
    }
}

impl fmt::Display for SchemeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Details", self.name)?;
        if let Some(scheme_type) = &self.scheme_type {
            writeln!(f, "Type: {}", scheme_type)?;
        }
        writeln!(f, "Interest Rate: {}", format_percent(self.interest_rate))?;
        writeln!(f, "Processing Fee: {}", format_percent(self.processing_fee_percent))?;
        writeln!(f, "Duration: {} days", self.duration_days)?;
        if let Some(min) = self.minimum_period_days {
            writeln!(f, "Min. Period: {} days", min)?;
        }
        writeln!(f, "Grace Period: {} days", self.grace_period_days)?;
        if self.no_interest_period_days > 0 {
            writeln!(f, "No-Interest Period: {} days", self.no_interest_period_days)?;
        }
        if let Some(date) = self.expected_maturity {
            writeln!(f, "Expected Maturity: {}", format_date(date))?;
        }
        Ok(())
    }
}

/// Calculation summary container
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub metrics: LoanMetrics,
    pub dates: Option<MaturityDates>,
    pub maturity: Option<MaturityStatement>,
    pub gold: Option<GoldLimits>,
}

impl MetricsSummary {
    pub fn new(metrics: LoanMetrics) -> Self {
        Self {
            metrics,
            dates: None,
            maturity: None,
            gold: None,
        }
    }

    /// Principal exceeds the maximum the collateral supports
    pub fn exceeds_collateral(&self) -> bool {
        self.gold
            .map(|g| self.metrics.principal > g.max_loan)
            .unwrap_or(false)
    }
}

impl fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.metrics;
        writeln!(f, "Loan Calculation Summary")?;
        writeln!(f, "Principal Amount: {}", format_inr(m.principal))?;
        writeln!(f, "Interest Rate: {}", format_percent(m.annual_interest_rate))?;
        writeln!(f, "Processing Fee: {}", format_inr(m.processing_fee))?;
        writeln!(f, "Interest Amount: {}", format_inr(m.interest_amount))?;
        writeln!(f, "Total Repayment: {}", format_inr(m.total_repayment))?;
        writeln!(f, "Distribution Amount: {}", format_inr(m.distribution_amount))?;
        writeln!(
            f,
            "Monthly Interest: {} ({} per month, {} per ₹1,000)",
            format_inr(m.monthly_interest_amount),
            format_percent(m.monthly_interest_rate),
            format_inr(m.per_thousand_rate)
        )?;

        if let Some(dates) = self.dates {
            writeln!(f, "Due Date: {}", format_date(dates.due_date))?;
            writeln!(f, "Grace Period End: {}", format_date(dates.grace_period_end))?;
        }
        if let Some(maturity) = self.maturity {
            if maturity.interest_free {
                writeln!(f, "Interest at Maturity: {} (no-interest period)", format_inr(0))?;
            } else {
                writeln!(
                    f,
                    "Interest at Maturity: {} ({} months)",
                    format_inr(maturity.interest_at_maturity),
                    maturity.months_charged
                )?;
            }
            writeln!(
                f,
                "Total Payable at Maturity: {}",
                format_inr(maturity.total_payable_at_maturity)
            )?;
        }
        if let Some(gold) = self.gold {
            writeln!(f, "Gold Value: {}", format_inr(gold.gold_value))?;
            writeln!(
                f,
                "Loan Range: {} to {} (suggested {})",
                format_inr(gold.min_loan),
                format_inr(gold.max_loan),
                format_inr(gold.suggested_loan)
            )?;
            if self.exceeds_collateral() {
                writeln!(f, "Warning: principal exceeds the maximum loan for this collateral")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawnshop_core::{compute_dates, compute_loan_metrics};

    fn scheme() -> SchemeInfo {
        SchemeInfo::new("3", "Gold Plus", 12.0, 90)
            .with_processing_fee(1.5)
            .with_scheme_type("standard")
    }

    #[test]
    fn test_scheme_summary_lines() {
        let issue = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let summary = SchemeSummary::new(
            &scheme(),
            &CalculatorOptions::default(),
            Some(compute_dates(issue, 90, 30)),
        );
        let text = summary.to_string();

        assert!(text.starts_with("Gold Plus Details\n"));
        assert!(text.contains("Type: standard\n"));
        assert!(text.contains("Interest Rate: 12%\n"));
        assert!(text.contains("Processing Fee: 1.5%\n"));
        assert!(text.contains("Duration: 90 days\n"));
        assert!(text.contains("Expected Maturity: 2023-04-01\n"));
        assert!(!text.contains("Min. Period"));
        assert!(!text.contains("No-Interest"));
    }

    #[test]
    fn test_default_fee_percent_shown() {
        let options = CalculatorOptions {
            default_grace_days: 7,
            ..CalculatorOptions::default()
        };
        let summary = SchemeSummary::new(&SchemeInfo::new("1", "Basic", 18.0, 30), &options, None);
        assert_eq!(summary.processing_fee_percent, 1.0);
        assert_eq!(summary.grace_period_days, 7);
        assert_eq!(summary.help_text(), "Basic: 18% p.a. for 30 days");
    }

    #[test]
    fn test_metrics_summary_formatting() {
        let summary = MetricsSummary::new(compute_loan_metrics(123_456, 12.0, 1_235));
        let text = summary.to_string();

        assert!(text.contains("Principal Amount: ₹1,23,456\n"));
        assert!(text.contains("Distribution Amount: ₹1,22,221\n"));
        assert!(!text.contains("Due Date"));
    }

    #[test]
    fn test_collateral_warning() {
        let mut summary = MetricsSummary::new(compute_loan_metrics(50_000, 12.0, 0));
        summary.gold = Some(GoldLimits {
            gold_value: 54_960,
            min_loan: 27_480,
            max_loan: 46_716,
            suggested_loan: 41_220,
        });
        assert!(summary.exceeds_collateral());
        assert!(summary.to_string().contains("Warning:"));
    }

    #[test]
    fn test_panel_visibility() {
        assert!(!SchemePanel::Hidden.is_visible());
        assert!(SchemePanel::Error(SCHEME_LOAD_ERROR.to_string()).is_visible());
        assert_eq!(
            SchemePanel::Error(SCHEME_LOAD_ERROR.to_string()).to_string(),
            SCHEME_LOAD_ERROR
        );
    }
}
