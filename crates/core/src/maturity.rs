//! Maturity dates and interest statements
//!
//! Due date and grace period end come straight from the scheme duration.
//! The statements charge interest per started month on the monthly amount,
//! and waive it entirely inside a scheme's no-interest period.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::loan::compute_loan_metrics;
use crate::money::Rupees;

/// Days after the due date before a loan counts as overdue, when the scheme
/// does not say otherwise
pub const DEFAULT_GRACE_DAYS: u32 = 30;

/// Serialization format of every date the widgets read or write
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Due date and end of grace period for a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityDates {
    pub due_date: NaiveDate,
    pub grace_period_end: NaiveDate,
}

/// `due = issue + duration_days`, `grace_end = due + grace_days`
pub fn compute_dates(issue_date: NaiveDate, duration_days: u32, grace_days: u32) -> MaturityDates {
    let due_date = add_days(issue_date, duration_days);
    MaturityDates {
        due_date,
        grace_period_end: add_days(due_date, grace_days),
    }
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Format as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` field value; blank or malformed input is `None`
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Calendar months from `start` to `end`, counting a partial month as whole
///
/// Negative spans are zero.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut months =
        (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() > start.day() {
        months += 1;
    }
    months.max(0) as u32
}

/// What a loan costs if held until its due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityStatement {
    pub months_charged: u32,
    pub interest_at_maturity: Rupees,
    pub total_payable_at_maturity: Rupees,
    /// The whole term falls inside the scheme's no-interest period
    pub interest_free: bool,
}

/// Interest and total payable at maturity
pub fn maturity_statement(
    principal: Rupees,
    annual_rate: f64,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    no_interest_period_days: u32,
) -> MaturityStatement {
    let term_days = (due_date - issue_date).num_days();
    if no_interest_period_days > 0 && term_days <= i64::from(no_interest_period_days) {
        return MaturityStatement {
            months_charged: 0,
            interest_at_maturity: 0,
            total_payable_at_maturity: principal,
            interest_free: true,
        };
    }

    let months = months_between(issue_date, due_date);
    let monthly = compute_loan_metrics(principal, annual_rate, 0).monthly_interest_amount;
    let interest = monthly.saturating_mul(i64::from(months));

    MaturityStatement {
        months_charged: months,
        interest_at_maturity: interest,
        total_payable_at_maturity: principal.saturating_add(interest),
        interest_free: false,
    }
}

/// Position of an active loan on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualStatement {
    pub days_since_issue: i64,
    /// Days until the due date, zero once it has passed
    pub days_remaining: i64,
    pub overdue: bool,
    pub months_elapsed: u32,
    pub interest_accrued: Rupees,
    pub total_payable: Rupees,
}

/// Interest accrued on an active loan as of `today`
///
/// The current month is always charged once at least one day of it has run.
/// Inside the no-interest period nothing accrues.
pub fn accrual_statement(
    principal: Rupees,
    annual_rate: f64,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    today: NaiveDate,
    no_interest_period_days: u32,
) -> AccrualStatement {
    let days_since_issue = (today - issue_date).num_days();
    let days_remaining = (due_date - today).num_days().max(0);
    let overdue = today > due_date;

    let raw_months =
        (today.year() - issue_date.year()) * 12 + today.month() as i32 - issue_date.month() as i32;
    let months_elapsed = if raw_months > 0 || (raw_months == 0 && today.day() > issue_date.day()) {
        raw_months + 1
    } else {
        raw_months
    }
    .max(0) as u32;

    let in_free_period = no_interest_period_days > 0
        && days_since_issue <= i64::from(no_interest_period_days);

    let interest_accrued = if in_free_period {
        0
    } else {
        compute_loan_metrics(principal, annual_rate, 0)
            .monthly_interest_amount
            .saturating_mul(i64::from(months_elapsed))
    };

    AccrualStatement {
        days_since_issue,
        days_remaining,
        overdue,
        months_elapsed,
        interest_accrued,
        total_payable: principal.saturating_add(interest_accrued),
    }
}
