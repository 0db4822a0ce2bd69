//! Loan form shell
//!
//! Binds the pure calculations in `pawnshop-core` to a loan form: raw field
//! values go in, derived fields and display panels come out. The only I/O is
//! one scheme fetch per selector change, through an injected
//! [`SchemeSource`](pawnshop_core::SchemeSource).

pub mod calculator;
pub mod display;
pub mod form;

pub use calculator::{CalculatorOptions, FetchOutcome, FetchTicket, LoanCalculator, SchemeState};
pub use display::{MetricsSummary, SchemePanel, SchemeSummary, SCHEME_LOAD_ERROR};
pub use form::{Field, LoanForm, DEFAULT_SCHEME_HELP};
