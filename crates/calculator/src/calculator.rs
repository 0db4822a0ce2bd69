//! Loan calculator
//!
//! Keeps the loan form consistent with the selected scheme. Selecting a
//! scheme fetches it once; every later edit recomputes from the cached
//! snapshot. Fetches carry a generation ticket so a response that arrives
//! after a newer selection is discarded.

use chrono::NaiveDate;
use parking_lot::Mutex;
use pawnshop_config::Settings;
use pawnshop_core::{
    compute_dates, compute_loan_metrics, format_date, maturity_statement, parse_amount,
    parse_date, parse_number, GoldValuator, Karat, MaturityDates, Notifier, SchemeError,
    SchemeInfo, SchemeSource, Severity, DEFAULT_GRACE_DAYS,
};
use std::sync::Arc;

use crate::display::{MetricsSummary, SchemePanel, SchemeSummary, SCHEME_LOAD_ERROR};
use crate::form::{Field, LoanForm};

type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Calculator defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculatorOptions {
    /// Processing fee percent for schemes that carry none
    pub default_fee_percent: f64,
    /// Grace period for schemes that carry none
    pub default_grace_days: u32,
    pub valuator: GoldValuator,
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        Self {
            default_fee_percent: 1.0,
            default_grace_days: DEFAULT_GRACE_DAYS,
            valuator: GoldValuator::default(),
        }
    }
}

impl CalculatorOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            default_fee_percent: settings.loan.processing_fee_percent,
            default_grace_days: settings.loan.grace_period_days,
            valuator: settings.gold.valuator(),
        }
    }
}

/// Scheme synchronization state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemeState {
    #[default]
    Idle,
    SchemeLoaded(SchemeInfo),
}

impl SchemeState {
    pub fn scheme(&self) -> Option<&SchemeInfo> {
        match self {
            SchemeState::Idle => None,
            SchemeState::SchemeLoaded(scheme) => Some(scheme),
        }
    }
}

/// Handle for one in-flight scheme fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    scheme_id: String,
}

impl FetchTicket {
    pub fn scheme_id(&self) -> &str {
        &self.scheme_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of a scheme selector change
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Scheme applied to the form
    Applied(SchemeInfo),
    /// Fetch failed; the error panel is showing
    Failed(SchemeError),
    /// A newer selection superseded this fetch; nothing changed
    Stale,
    /// Selector was emptied
    Cleared,
}

struct Inner {
    form: LoanForm,
    state: SchemeState,
    generation: u64,
    pending: Option<u64>,
}

/// Reactive loan calculator bound to one form
pub struct LoanCalculator {
    source: Arc<dyn SchemeSource>,
    notifier: Arc<dyn Notifier>,
    options: CalculatorOptions,
    today: Today,
    inner: Mutex<Inner>,
}

impl LoanCalculator {
    pub fn new(
        source: Arc<dyn SchemeSource>,
        notifier: Arc<dyn Notifier>,
        options: CalculatorOptions,
    ) -> Self {
        Self {
            source,
            notifier,
            options,
            today: Arc::new(|| chrono::Local::now().date_naive()),
            inner: Mutex::new(Inner {
                form: LoanForm::new(),
                state: SchemeState::Idle,
                generation: 0,
                pending: None,
            }),
        }
    }

    /// Start from a prefilled form
    pub fn with_form(self, form: LoanForm) -> Self {
        self.inner.lock().form = form;
        self
    }

    /// Override the clock used to default the issue date
    pub fn with_today<F>(mut self, today: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.today = Arc::new(today);
        self
    }

    pub fn options(&self) -> &CalculatorOptions {
        &self.options
    }

    /// Snapshot of the form
    pub fn form(&self) -> LoanForm {
        self.inner.lock().form.clone()
    }

    pub fn state(&self) -> SchemeState {
        self.inner.lock().state.clone()
    }

    pub fn scheme(&self) -> Option<SchemeInfo> {
        self.inner.lock().state.scheme().cloned()
    }

    /// A fetch is in flight and has not been superseded
    pub fn is_loading(&self) -> bool {
        let inner = self.inner.lock();
        inner.pending == Some(inner.generation)
    }

    /// Bring derived fields up to date with whatever the form was loaded with
    ///
    /// A preselected scheme is fetched; otherwise metrics are computed from
    /// the current values.
    pub async fn initialize(&self) -> Option<FetchOutcome> {
        let selected = self.inner.lock().form.value(Field::Scheme).trim().to_string();
        if !selected.is_empty() {
            return Some(self.on_scheme_change(&selected).await);
        }

        let mut inner = self.inner.lock();
        self.recalculate(&mut inner);
        None
    }

    /// Scheme selector changed
    pub async fn on_scheme_change(&self, value: &str) -> FetchOutcome {
        let value = value.trim();
        if value.is_empty() {
            self.clear_scheme();
            return FetchOutcome::Cleared;
        }

        let ticket = self.begin_scheme_fetch(value);
        let result = self.source.fetch_scheme(ticket.scheme_id()).await;
        self.complete_scheme_fetch(ticket, result)
    }

    /// Record a selection and hand out the ticket its response must present
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn begin_scheme_fetch(&self, scheme_id: &str) -> FetchTicket {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.pending = Some(inner.generation);
        inner.form.set(Field::Scheme, scheme_id);

        tracing::debug!(scheme_id = %scheme_id, generation = inner.generation, "Scheme fetch started");
        FetchTicket {
            generation: inner.generation,
            scheme_id: scheme_id.to_string(),
        }
    }

    /// Apply a fetch result if its ticket is still current
    pub fn complete_scheme_fetch(
        &self,
        ticket: FetchTicket,
        result: Result<SchemeInfo, SchemeError>,
    ) -> FetchOutcome {
        let failure = {
            let mut inner = self.inner.lock();
            if ticket.generation != inner.generation {
                tracing::debug!(
                    scheme_id = %ticket.scheme_id,
                    generation = ticket.generation,
                    current = inner.generation,
                    "Discarding stale scheme response"
                );
                return FetchOutcome::Stale;
            }
            inner.pending = None;

            match result {
                Ok(scheme) => {
                    self.apply_scheme(&mut inner, scheme.clone());
                    return FetchOutcome::Applied(scheme);
                }
                Err(err) => {
                    tracing::error!(scheme_id = %ticket.scheme_id, error = %err, "Failed to load scheme");
                    inner.state = SchemeState::Idle;
                    inner.form.scheme_panel = SchemePanel::Error(SCHEME_LOAD_ERROR.to_string());
                    inner.form.restore_scheme_help();
                    self.recalculate(&mut inner);
                    err
                }
            }
        };

        // Outside the lock: a notifier may call back into the calculator
        self.notifier.notify(
            &format!("Failed to load scheme details: {}", failure),
            Severity::Error,
        );
        FetchOutcome::Failed(failure)
    }

    /// Any non-selector field changed
    ///
    /// Selector changes go through [`on_scheme_change`](Self::on_scheme_change).
    /// Here a blank selector clears the scheme and any other selector value is
    /// ignored, so the form never names a scheme that was not applied.
    pub fn on_input(&self, field: Field, value: &str) {
        if field.is_write_only() {
            tracing::debug!(field = %field, "Ignoring input to derived field");
            return;
        }
        if field == Field::Scheme {
            if value.trim().is_empty() {
                self.clear_scheme();
            } else {
                tracing::debug!(value = %value, "Scheme selection needs a fetch; input ignored");
            }
            return;
        }

        let mut inner = self.inner.lock();
        inner.form.set(field, value);

        match field {
            Field::Principal => {
                if let Some(scheme) = inner.state.scheme().cloned() {
                    self.apply_processing_fee(&mut inner, &scheme);
                }
            }
            Field::IssueDate => {
                if let Some(scheme) = inner.state.scheme().cloned() {
                    let dates = self.apply_dates(&mut inner, &scheme);
                    inner.form.scheme_panel =
                        SchemePanel::Details(SchemeSummary::new(&scheme, &self.options, dates));
                }
            }
            _ => {}
        }

        self.recalculate(&mut inner);
    }

    /// Route a change from any field
    pub async fn dispatch(&self, field: Field, value: &str) -> Option<FetchOutcome> {
        match field {
            Field::Scheme => Some(self.on_scheme_change(value).await),
            _ => {
                self.on_input(field, value);
                None
            }
        }
    }

    fn clear_scheme(&self) {
        let mut inner = self.inner.lock();
        // In-flight responses for the previous selection no longer apply
        inner.generation += 1;
        inner.pending = None;
        inner.state = SchemeState::Idle;
        inner.form.set(Field::Scheme, "");
        inner.form.scheme_panel = SchemePanel::Hidden;
        inner.form.restore_scheme_help();
        self.recalculate(&mut inner);
        tracing::debug!("Scheme selection cleared");
    }

    fn apply_scheme(&self, inner: &mut Inner, scheme: SchemeInfo) {
        inner
            .form
            .set(Field::InterestRate, scheme.interest_rate.to_string());
        self.apply_processing_fee(inner, &scheme);
        let dates = self.apply_dates(inner, &scheme);

        let summary = SchemeSummary::new(&scheme, &self.options, dates);
        inner.form.set_scheme_help(summary.help_text());
        inner.form.scheme_panel = SchemePanel::Details(summary);

        tracing::info!(scheme_id = %scheme.id, name = %scheme.name, "Scheme applied");
        inner.state = SchemeState::SchemeLoaded(scheme);
        self.recalculate(inner);
    }

    /// Fee only follows the scheme once a principal has been entered
    fn apply_processing_fee(&self, inner: &mut Inner, scheme: &SchemeInfo) {
        if inner.form.is_blank(Field::Principal) {
            return;
        }
        let principal = parse_amount(inner.form.value(Field::Principal));
        let fee = scheme.processing_fee_for(principal, self.options.default_fee_percent);
        inner.form.set(Field::ProcessingFee, fee.to_string());
    }

    /// Default the issue date to today, then derive due and grace-end dates
    fn apply_dates(&self, inner: &mut Inner, scheme: &SchemeInfo) -> Option<MaturityDates> {
        let issue = if inner.form.is_blank(Field::IssueDate) {
            let today = (self.today)();
            inner.form.set(Field::IssueDate, format_date(today));
            today
        } else {
            match parse_date(inner.form.value(Field::IssueDate)) {
                Some(date) => date,
                None => {
                    tracing::debug!(
                        value = %inner.form.value(Field::IssueDate),
                        "Unparseable issue date; dates left unchanged"
                    );
                    return None;
                }
            }
        };

        let dates = compute_dates(
            issue,
            scheme.loan_duration_days,
            scheme.grace_days_or(self.options.default_grace_days),
        );
        inner.form.set(Field::DueDate, format_date(dates.due_date));
        inner
            .form
            .set(Field::GracePeriodEnd, format_date(dates.grace_period_end));
        Some(dates)
    }

    fn recalculate(&self, inner: &mut Inner) {
        let form = &inner.form;
        let principal = parse_amount(form.value(Field::Principal));
        let rate = parse_number(form.value(Field::InterestRate));
        let fee = parse_amount(form.value(Field::ProcessingFee));
        let metrics = compute_loan_metrics(principal, rate, fee);

        let gold = self.options.valuator.limits(
            parse_number(form.value(Field::GoldMarketPrice)),
            Karat::parse(form.value(Field::Karat)),
            parse_number(form.value(Field::NetWeight)),
        );

        let mut summary = MetricsSummary::new(metrics);
        summary.gold = gold;
        if let Some(scheme) = inner.state.scheme() {
            let issue = parse_date(form.value(Field::IssueDate));
            let due = parse_date(form.value(Field::DueDate));
            if let (Some(issue), Some(due)) = (issue, due) {
                summary.dates = parse_date(form.value(Field::GracePeriodEnd)).map(|grace_end| {
                    MaturityDates {
                        due_date: due,
                        grace_period_end: grace_end,
                    }
                });
                summary.maturity = Some(maturity_statement(
                    principal,
                    rate,
                    issue,
                    due,
                    scheme.no_interest_period_days,
                ));
            }
        }

        inner
            .form
            .set(Field::DistributionAmount, metrics.distribution_amount.to_string());
        inner.form.gold = gold;
        inner.form.metrics = Some(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pawnshop_core::NoopNotifier;

    struct Fixed(SchemeInfo);

    #[async_trait]
    impl SchemeSource for Fixed {
        async fn fetch_scheme(&self, _scheme_id: &str) -> Result<SchemeInfo, SchemeError> {
            Ok(self.0.clone())
        }
    }

    fn calculator(scheme: SchemeInfo) -> LoanCalculator {
        LoanCalculator::new(
            Arc::new(Fixed(scheme)),
            Arc::new(NoopNotifier),
            CalculatorOptions::default(),
        )
        .with_today(|| NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
    }

    #[test]
    fn test_inputs_without_scheme() {
        let calc = calculator(SchemeInfo::new("1", "Basic", 18.0, 30));
        calc.on_input(Field::Principal, "75000");
        calc.on_input(Field::InterestRate, "18");
        calc.on_input(Field::ProcessingFee, "750");

        let form = calc.form();
        assert_eq!(form.value(Field::DistributionAmount), "74250");
        let metrics = form.metrics().unwrap();
        assert_eq!(metrics.metrics.interest_amount, 13_500);
        assert!(metrics.maturity.is_none());
        // Without a scheme the issue date is never defaulted
        assert!(form.is_blank(Field::IssueDate));
    }

    #[test]
    fn test_derived_field_rejects_input() {
        let calc = calculator(SchemeInfo::new("1", "Basic", 18.0, 30));
        calc.on_input(Field::Principal, "1000");
        calc.on_input(Field::DistributionAmount, "5");
        assert_eq!(calc.form().value(Field::DistributionAmount), "1000");
    }

    #[tokio::test]
    async fn test_fee_left_alone_without_principal() {
        let calc = calculator(SchemeInfo::new("1", "Basic", 18.0, 30).with_processing_fee(2.0));
        calc.on_scheme_change("1").await;
        assert!(calc.form().is_blank(Field::ProcessingFee));

        calc.on_input(Field::Principal, "10000");
        assert_eq!(calc.form().value(Field::ProcessingFee), "200");
    }

    #[tokio::test]
    async fn test_selector_input_keeps_applied_scheme() {
        let calc = calculator(SchemeInfo::new("1", "Basic", 18.0, 30));
        calc.on_scheme_change("1").await;

        calc.on_input(Field::Scheme, "2");
        assert_eq!(calc.form().value(Field::Scheme), "1");
        assert_eq!(calc.scheme().map(|s| s.id), Some("1".to_string()));

        let ticket = calc.begin_scheme_fetch("1");
        calc.on_input(Field::Scheme, " ");
        assert_eq!(calc.state(), SchemeState::Idle);
        assert!(calc.form().is_blank(Field::Scheme));
        assert!(!calc.is_loading());
        assert_eq!(
            calc.complete_scheme_fetch(ticket, Ok(SchemeInfo::new("1", "Basic", 18.0, 30))),
            FetchOutcome::Stale
        );
    }

    #[tokio::test]
    async fn test_ticket_generations_increase() {
        let calc = calculator(SchemeInfo::new("1", "Basic", 18.0, 30));
        let a = calc.begin_scheme_fetch("1");
        let b = calc.begin_scheme_fetch("2");
        assert!(b.generation() > a.generation());
        assert!(calc.is_loading());
        assert_eq!(
            calc.complete_scheme_fetch(a, Err(SchemeError::NotFound("1".into()))),
            FetchOutcome::Stale
        );
        assert!(calc.is_loading());
    }
}
