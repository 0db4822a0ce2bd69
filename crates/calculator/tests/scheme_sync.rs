//! Loan form synchronization against scheme sources

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use pawnshop_calculator::{
    CalculatorOptions, FetchOutcome, Field, LoanCalculator, LoanForm, SchemePanel, SchemeState,
    SCHEME_LOAD_ERROR,
};
use pawnshop_config::Settings;
use pawnshop_core::{Notifier, SchemeError, SchemeInfo, SchemeSource, Severity};
use pawnshop_integrations::StaticSchemeSource;

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages.lock().push((message.to_string(), severity));
    }
}

/// Always answers with the same error
struct FailingSource(SchemeError);

#[async_trait]
impl SchemeSource for FailingSource {
    async fn fetch_scheme(&self, _scheme_id: &str) -> Result<SchemeInfo, SchemeError> {
        Err(self.0.clone())
    }
}

/// Answers scheme "slow" after a delay and everything else immediately
struct DelayedSource(StaticSchemeSource);

#[async_trait]
impl SchemeSource for DelayedSource {
    async fn fetch_scheme(&self, scheme_id: &str) -> Result<SchemeInfo, SchemeError> {
        if scheme_id == "slow" {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.0.fetch_scheme(scheme_id).await
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn schemes() -> StaticSchemeSource {
    StaticSchemeSource::new()
        .with_scheme(
            SchemeInfo::new("3", "Gold Plus", 18.0, 90)
                .with_processing_fee(1.0)
                .with_scheme_type("standard"),
        )
        .with_scheme(SchemeInfo::new("7", "Quick Cash", 24.0, 30))
        .with_scheme(SchemeInfo::new("9", "Festival", 12.0, 30).with_no_interest_period(30))
        .with_scheme(SchemeInfo::new("slow", "Slow", 10.0, 60))
}

fn calculator_with(source: Arc<dyn SchemeSource>, notifier: Arc<RecordingNotifier>) -> LoanCalculator {
    LoanCalculator::new(source, notifier, CalculatorOptions::default())
        .with_today(|| day(2023, 1, 1))
}

fn calculator() -> (LoanCalculator, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    (calculator_with(Arc::new(schemes()), notifier.clone()), notifier)
}

#[tokio::test]
async fn test_scheme_selection_fills_form() {
    let (calc, notifier) = calculator();
    calc.on_input(Field::Principal, "75000");

    let outcome = calc.on_scheme_change("3").await;
    assert!(matches!(outcome, FetchOutcome::Applied(ref s) if s.name == "Gold Plus"));

    let form = calc.form();
    assert_eq!(form.value(Field::InterestRate), "18");
    assert_eq!(form.value(Field::ProcessingFee), "750");
    assert_eq!(form.value(Field::DistributionAmount), "74250");
    assert_eq!(form.value(Field::IssueDate), "2023-01-01");
    assert_eq!(form.value(Field::DueDate), "2023-04-01");
    assert_eq!(form.value(Field::GracePeriodEnd), "2023-05-01");
    assert_eq!(form.scheme_help(), "Gold Plus: 18% p.a. for 90 days");

    let details = form.scheme_panel().details().unwrap();
    assert_eq!(details.expected_maturity, Some(day(2023, 4, 1)));

    let summary = form.metrics().unwrap();
    assert_eq!(summary.metrics.interest_amount, 13_500);
    assert_eq!(summary.metrics.total_repayment, 88_500);
    let maturity = summary.maturity.unwrap();
    assert_eq!(maturity.months_charged, 3);
    assert_eq!(maturity.interest_at_maturity, 3_375);
    assert_eq!(maturity.total_payable_at_maturity, 78_375);

    assert!(notifier.messages.lock().is_empty());
    assert!(matches!(calc.state(), SchemeState::SchemeLoaded(_)));
}

#[tokio::test]
async fn test_existing_issue_date_kept() {
    let (calc, _) = calculator();
    calc.on_input(Field::IssueDate, "2024-01-01");
    calc.on_scheme_change("3").await;

    let form = calc.form();
    assert_eq!(form.value(Field::IssueDate), "2024-01-01");
    assert_eq!(form.value(Field::DueDate), "2024-03-31");
    assert_eq!(form.value(Field::GracePeriodEnd), "2024-04-30");
}

#[tokio::test]
async fn test_edits_recompute_from_cached_scheme() {
    let (calc, _) = calculator();
    calc.on_scheme_change("3").await;

    calc.on_input(Field::Principal, "20000");
    assert_eq!(calc.form().value(Field::ProcessingFee), "200");
    assert_eq!(calc.form().value(Field::DistributionAmount), "19800");

    calc.on_input(Field::IssueDate, "2023-02-01");
    let form = calc.form();
    assert_eq!(form.value(Field::DueDate), "2023-05-02");
    assert_eq!(
        form.scheme_panel().details().unwrap().expected_maturity,
        Some(day(2023, 5, 2))
    );
}

#[tokio::test]
async fn test_default_fee_percent_applies() {
    let (calc, _) = calculator();
    calc.on_input(Field::Principal, "12345");
    calc.on_scheme_change("7").await;
    // 1% of 12,345 rounds to 123
    assert_eq!(calc.form().value(Field::ProcessingFee), "123");
}

#[tokio::test]
async fn test_configured_grace_applies_to_schemes_without_one() {
    let mut settings = Settings::default();
    settings.loan.grace_period_days = 7;
    let calc = LoanCalculator::new(
        Arc::new(schemes()),
        Arc::new(RecordingNotifier::default()),
        CalculatorOptions::from_settings(&settings),
    )
    .with_today(|| day(2023, 1, 1));

    calc.on_scheme_change("7").await;
    let form = calc.form();
    assert_eq!(form.value(Field::DueDate), "2023-01-31");
    assert_eq!(form.value(Field::GracePeriodEnd), "2023-02-07");
    assert_eq!(form.scheme_panel().details().unwrap().grace_period_days, 7);

    // A scheme's own grace period still wins
    let source = StaticSchemeSource::new()
        .with_scheme(SchemeInfo::new("12", "Strict", 24.0, 30).with_grace_period(0));
    let calc = LoanCalculator::new(
        Arc::new(source),
        Arc::new(RecordingNotifier::default()),
        CalculatorOptions::from_settings(&settings),
    )
    .with_today(|| day(2023, 1, 1));
    calc.on_scheme_change("12").await;
    assert_eq!(calc.form().value(Field::GracePeriodEnd), "2023-01-31");
}

#[tokio::test]
async fn test_no_interest_period_waives_interest() {
    let (calc, _) = calculator();
    calc.on_input(Field::Principal, "10000");
    calc.on_scheme_change("9").await;

    let maturity = calc.form().metrics().unwrap().maturity.unwrap();
    assert!(maturity.interest_free);
    assert_eq!(maturity.interest_at_maturity, 0);
    assert_eq!(maturity.total_payable_at_maturity, 10_000);
}

#[tokio::test]
async fn test_clearing_selector_restores_help() {
    let notifier = Arc::new(RecordingNotifier::default());
    let calc = calculator_with(Arc::new(schemes()), notifier)
        .with_form(LoanForm::with_scheme_help("Choose the loan scheme"));

    calc.on_scheme_change("3").await;
    assert_ne!(calc.form().scheme_help(), "Choose the loan scheme");

    assert_eq!(calc.on_scheme_change("").await, FetchOutcome::Cleared);
    let form = calc.form();
    assert_eq!(form.scheme_help(), "Choose the loan scheme");
    assert_eq!(form.scheme_panel(), &SchemePanel::Hidden);
    assert_eq!(calc.state(), SchemeState::Idle);
}

#[tokio::test]
async fn test_fetch_failure_shows_error_and_notifies() {
    let notifier = Arc::new(RecordingNotifier::default());
    let source = Arc::new(FailingSource(SchemeError::Status {
        status: 500,
        body: "boom".to_string(),
    }));
    let calc = calculator_with(source, notifier.clone());
    calc.on_input(Field::Principal, "5000");

    let outcome = calc.on_scheme_change("3").await;
    assert!(matches!(outcome, FetchOutcome::Failed(ref e) if e.status() == Some(500)));

    let form = calc.form();
    assert_eq!(
        form.scheme_panel(),
        &SchemePanel::Error(SCHEME_LOAD_ERROR.to_string())
    );
    assert_eq!(calc.state(), SchemeState::Idle);
    // Metrics still follow the fields the user typed
    assert_eq!(form.value(Field::DistributionAmount), "5000");

    let messages = notifier.messages.lock();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, Severity::Error);
}

#[tokio::test]
async fn test_unknown_scheme_fails() {
    let (calc, notifier) = calculator();
    let outcome = calc.on_scheme_change("404").await;
    assert_eq!(
        outcome,
        FetchOutcome::Failed(SchemeError::NotFound("404".to_string()))
    );
    assert_eq!(notifier.messages.lock().len(), 1);
}

#[tokio::test]
async fn test_out_of_order_response_discarded() {
    let notifier = Arc::new(RecordingNotifier::default());
    let calc = calculator_with(Arc::new(DelayedSource(schemes())), notifier);

    let (slow, fast) = futures::join!(calc.on_scheme_change("slow"), calc.on_scheme_change("7"));

    assert_eq!(slow, FetchOutcome::Stale);
    assert!(matches!(fast, FetchOutcome::Applied(ref s) if s.id == "7"));
    assert_eq!(calc.scheme().unwrap().name, "Quick Cash");
    assert_eq!(calc.form().value(Field::Scheme), "7");
    assert!(!calc.is_loading());
}

#[tokio::test]
async fn test_clear_while_loading_discards_response() {
    let (calc, _) = calculator();
    let ticket = calc.begin_scheme_fetch("3");
    assert_eq!(calc.on_scheme_change(" ").await, FetchOutcome::Cleared);

    let scheme = SchemeInfo::new("3", "Gold Plus", 18.0, 90);
    assert_eq!(calc.complete_scheme_fetch(ticket, Ok(scheme)), FetchOutcome::Stale);
    assert_eq!(calc.state(), SchemeState::Idle);
}

#[tokio::test]
async fn test_initialize_fetches_preselected_scheme() {
    let (calc, _) = calculator();
    let calc = calc.with_form(
        LoanForm::new()
            .with_value(Field::Scheme, "3")
            .with_value(Field::Principal, "1000"),
    );

    let outcome = calc.initialize().await;
    assert!(matches!(outcome, Some(FetchOutcome::Applied(_))));
    assert_eq!(calc.form().value(Field::ProcessingFee), "10");
}

#[tokio::test]
async fn test_gold_limits_follow_inputs() {
    let (calc, _) = calculator();
    calc.dispatch(Field::GoldMarketPrice, "6000").await;
    calc.dispatch(Field::Karat, "22").await;
    assert!(calc.form().gold_limits().is_none());

    calc.dispatch(Field::NetWeight, "10").await;
    let limits = *calc.form().gold_limits().unwrap();
    assert_eq!(limits.gold_value, 54_960);
    assert_eq!(limits.max_loan, 46_716);

    calc.dispatch(Field::NetWeight, "0").await;
    assert!(calc.form().gold_limits().is_none());
}
