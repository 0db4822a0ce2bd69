//! Core types and calculations for the pawnshop loan widgets
//!
//! This crate is the pure half of the loan form:
//! - Loan metrics (interest, repayment, distribution amount, monthly figures)
//! - Maturity dates and statements (due date, grace period, accrued interest)
//! - Gold-collateral valuation and lending limits
//! - Safe numeric parsing and rupee formatting
//! - Capability traits the impure shells depend on (scheme source,
//!   notifications, media devices)
//!
//! Nothing in here performs I/O.

pub mod error;
pub mod gold;
pub mod loan;
pub mod maturity;
pub mod money;
pub mod scheme;
pub mod traits;

pub use error::{MediaError, SchemeError};
pub use gold::{
    compute_gold_limits, GoldLimits, GoldValuationBasis, GoldValuator, Karat, LtvRatios,
};
pub use loan::{compute_loan_metrics, processing_fee, LoanMetrics};
pub use maturity::{
    accrual_statement, compute_dates, format_date, maturity_statement, months_between,
    parse_date, AccrualStatement, MaturityDates, MaturityStatement, DATE_FORMAT,
    DEFAULT_GRACE_DAYS,
};
pub use money::{format_inr, format_percent, parse_amount, parse_number, round_rupees, Rupees};
pub use scheme::SchemeInfo;
pub use traits::{
    FacingMode, MediaDevice, MediaStream, NoopNotifier, Notifier, SchemeSource, Severity,
    VideoConstraints,
};
