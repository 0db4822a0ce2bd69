//! Loan metrics
//!
//! Simple-interest figures shown on the loan form. All amounts are whole
//! rupees; the monthly rate is kept to two decimals.
//!
//! ```text
//! interest       = round(P × annual_rate / 100)
//! total          = P + interest
//! distribution   = P − processing_fee
//! monthly_rate   = annual_rate / 12
//! monthly_amount = round(P × monthly_rate / 100)
//! per_thousand   = round(monthly_rate / 100 × 1000)
//! ```

use serde::{Deserialize, Serialize};

use crate::money::{round_rate, round_rupees, Rupees};

/// Figures derived from principal, annual rate and processing fee
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanMetrics {
    pub principal: Rupees,
    /// Annual interest rate (percent) the figures were computed with
    pub annual_interest_rate: f64,
    pub processing_fee: Rupees,
    pub interest_amount: Rupees,
    pub total_repayment: Rupees,
    /// Cash actually handed out: principal minus processing fee. Not clamped.
    pub distribution_amount: Rupees,
    /// Monthly rate in percent, two decimals
    pub monthly_interest_rate: f64,
    pub monthly_interest_amount: Rupees,
    /// Monthly interest per ₹1,000 of principal
    pub per_thousand_rate: Rupees,
}

/// Compute loan metrics
///
/// Never fails. A non-finite rate is treated as zero.
pub fn compute_loan_metrics(principal: Rupees, annual_rate: f64, fee: Rupees) -> LoanMetrics {
    let annual_rate = if annual_rate.is_finite() {
        annual_rate
    } else {
        0.0
    };
    let p = principal as f64;

    let interest_amount = round_rupees(p * annual_rate / 100.0);
    let monthly_rate = annual_rate / 12.0;

    LoanMetrics {
        principal,
        annual_interest_rate: annual_rate,
        processing_fee: fee,
        interest_amount,
        total_repayment: principal.saturating_add(interest_amount),
        distribution_amount: principal.saturating_sub(fee),
        monthly_interest_rate: round_rate(monthly_rate),
        monthly_interest_amount: round_rupees(p * monthly_rate / 100.0),
        per_thousand_rate: round_rupees(monthly_rate / 100.0 * 1000.0),
    }
}

/// Processing fee for a principal at a percentage, in whole rupees
pub fn processing_fee(principal: Rupees, percent: f64) -> Rupees {
    round_rupees(principal as f64 * percent / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_and_total() {
        let m = compute_loan_metrics(50_000, 12.0, 500);
        assert_eq!(m.interest_amount, 6_000);
        assert_eq!(m.total_repayment, 56_000);
        assert_eq!(m.distribution_amount, 49_500);
    }

    #[test]
    fn test_monthly_figures() {
        let m = compute_loan_metrics(50_000, 12.0, 0);
        assert_eq!(m.monthly_interest_rate, 1.0);
        assert_eq!(m.monthly_interest_amount, 500);
        assert_eq!(m.per_thousand_rate, 10);
    }

    #[test]
    fn test_monthly_rate_rounded_to_two_places() {
        let m = compute_loan_metrics(10_000, 13.0, 0);
        assert_eq!(m.monthly_interest_rate, 1.08);
        // 10000 × 1.0833.. / 100
        assert_eq!(m.monthly_interest_amount, 108);
        assert_eq!(m.per_thousand_rate, 11);
    }

    #[test]
    fn test_interest_rounds_to_nearest_rupee() {
        // 1234 × 7.5 / 100 = 92.55
        let m = compute_loan_metrics(1_234, 7.5, 0);
        assert_eq!(m.interest_amount, 93);
        assert_eq!(m.total_repayment, 1_327);
    }

    #[test]
    fn test_distribution_not_clamped() {
        let m = compute_loan_metrics(1_000, 12.0, 1_500);
        assert_eq!(m.distribution_amount, -500);
    }

    #[test]
    fn test_zero_inputs() {
        let m = compute_loan_metrics(0, 0.0, 0);
        assert_eq!(m.interest_amount, 0);
        assert_eq!(m.total_repayment, 0);
        assert_eq!(m.distribution_amount, 0);
        assert_eq!(m.per_thousand_rate, 0);
    }

    #[test]
    fn test_non_finite_rate_is_zero() {
        let m = compute_loan_metrics(10_000, f64::NAN, 0);
        assert_eq!(m.interest_amount, 0);
        assert_eq!(m.annual_interest_rate, 0.0);
    }

    #[test]
    fn test_interest_property_over_integer_grid() {
        for p in (0..=100_000).step_by(7_919) {
            for r in 0..=36 {
                let m = compute_loan_metrics(p, r as f64, 0);
                let expected = ((p * r) as f64 / 100.0).round() as i64;
                assert_eq!(m.interest_amount, expected, "p={} r={}", p, r);
                assert_eq!(m.total_repayment, p + m.interest_amount);
            }
        }
    }

    #[test]
    fn test_processing_fee() {
        assert_eq!(processing_fee(50_000, 1.0), 500);
        assert_eq!(processing_fee(12_345, 1.5), 185);
        assert_eq!(processing_fee(0, 2.0), 0);
    }
}
