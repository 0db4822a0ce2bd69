//! Command-line interface for the loan calculator

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use pawnshop_calculator::{CalculatorOptions, FetchOutcome, Field, LoanCalculator, LoanForm};
use pawnshop_config::Settings;
use pawnshop_core::{
    accrual_statement, format_inr, GoldValuationBasis, GoldValuator, Karat, SchemeInfo,
    SchemeSource,
};
use pawnshop_integrations::{HttpSchemeClient, StaticSchemeSource, TracingNotifier};

/// Scheme id used for terms given on the command line
const CUSTOM_SCHEME_ID: &str = "custom";

/// Pawnshop loan calculator
#[derive(Parser)]
#[command(name = "loan-calc")]
#[command(about = "Gold loan terms, maturity and collateral limits", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration environment (loads config/{env}.toml over config/default.toml)
    #[arg(long, env = "PAWNSHOP_ENV", global = true)]
    pub env: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute loan metrics, maturity and collateral limits
    Calc(CalcArgs),

    /// Interest accrued on an active loan as of a given day
    Accrual(AccrualArgs),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Basis {
    /// Market price is for the selected karat
    KaratPrice,
    /// Market price is for 22K gold
    #[value(name = "benchmark-22k")]
    Benchmark22k,
}

impl From<Basis> for GoldValuationBasis {
    fn from(basis: Basis) -> Self {
        match basis {
            Basis::KaratPrice => GoldValuationBasis::KaratPrice,
            Basis::Benchmark22k => GoldValuationBasis::Benchmark22k,
        }
    }
}

#[derive(Args)]
pub struct CalcArgs {
    /// Principal amount in rupees
    #[arg(long)]
    pub principal: Option<String>,

    /// Annual interest rate in percent; overrides the scheme's rate
    #[arg(long)]
    pub rate: Option<String>,

    /// Processing fee in rupees; overrides the computed fee
    #[arg(long)]
    pub fee: Option<String>,

    /// Processing fee percent for custom terms
    #[arg(long)]
    pub fee_percent: Option<f64>,

    /// Issue date (YYYY-MM-DD); defaults to today when a scheme applies
    #[arg(long)]
    pub issue_date: Option<NaiveDate>,

    /// Loan duration in days for custom terms
    #[arg(long)]
    pub duration: Option<u32>,

    /// Grace period in days for custom terms
    #[arg(long)]
    pub grace: Option<u32>,

    /// Scheme to fetch and apply
    #[arg(long, conflicts_with = "duration")]
    pub scheme: Option<String>,

    /// Read schemes from a JSON file instead of the scheme endpoint
    #[arg(long, requires = "scheme")]
    pub schemes_file: Option<PathBuf>,

    /// Gold market price per gram
    #[arg(long)]
    pub gold_price: Option<String>,

    /// Gold karat (24, 22, 21, 20, 18, 14)
    #[arg(long)]
    pub karat: Option<Karat>,

    /// Net gold weight in grams
    #[arg(long)]
    pub weight: Option<String>,

    /// How the gold market price is interpreted; defaults to configuration
    #[arg(long, value_enum)]
    pub basis: Option<Basis>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct AccrualArgs {
    #[arg(long)]
    pub principal: String,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: String,

    #[arg(long)]
    pub issue_date: NaiveDate,

    #[arg(long)]
    pub due_date: NaiveDate,

    /// Day to compute for; defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Days from issue during which no interest is charged
    #[arg(long, default_value_t = 0)]
    pub no_interest_days: u32,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run a parsed command
pub async fn run(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Calc(args) => run_calc(args, settings).await,
        Commands::Accrual(args) => run_accrual(args),
    }
}

fn scheme_source(args: &CalcArgs, settings: &Settings) -> Result<Arc<dyn SchemeSource>> {
    if let Some(path) = &args.schemes_file {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schemes file {}", path.display()))?;
        let source = StaticSchemeSource::from_json(&json)
            .with_context(|| format!("Invalid schemes file {}", path.display()))?;
        tracing::info!(schemes = source.len(), path = %path.display(), "Loaded schemes file");
        return Ok(Arc::new(source));
    }

    if args.scheme.is_some() {
        let client = HttpSchemeClient::new(settings.schemes.clone())?;
        return Ok(Arc::new(client));
    }

    let mut source = StaticSchemeSource::new();
    if let Some(duration) = args.duration {
        let rate = args
            .rate
            .as_deref()
            .map(pawnshop_core::parse_number)
            .unwrap_or(0.0);
        source.insert(
            SchemeInfo::new(CUSTOM_SCHEME_ID, "Custom terms", rate, duration)
                .with_processing_fee(
                    args.fee_percent
                        .unwrap_or(settings.loan.processing_fee_percent),
                )
                .with_grace_period(args.grace.unwrap_or(settings.loan.grace_period_days)),
        );
    }
    Ok(Arc::new(source))
}

fn initial_form(args: &CalcArgs) -> LoanForm {
    let mut form = LoanForm::new();
    let values = [
        (Field::Principal, args.principal.clone()),
        (Field::InterestRate, args.rate.clone()),
        (Field::ProcessingFee, args.fee.clone()),
        (Field::IssueDate, args.issue_date.map(pawnshop_core::format_date)),
        (Field::GoldMarketPrice, args.gold_price.clone()),
        (Field::Karat, args.karat.map(|k| k.value().to_string())),
        (Field::NetWeight, args.weight.clone()),
    ];
    for (field, value) in values {
        if let Some(value) = value {
            form.set(field, value);
        }
    }
    form
}

async fn run_calc(args: CalcArgs, settings: &Settings) -> Result<()> {
    if args.duration.is_none() && (args.fee_percent.is_some() || args.grace.is_some()) {
        bail!("--fee-percent and --grace apply to custom terms and need --duration");
    }

    let mut options = CalculatorOptions::from_settings(settings);
    if let Some(basis) = args.basis {
        options.valuator =
            GoldValuator::new(basis.into()).with_ratios(*options.valuator.ratios());
    }

    let source = scheme_source(&args, settings)?;
    let calculator = LoanCalculator::new(source, Arc::new(TracingNotifier), options)
        .with_form(initial_form(&args));

    let selected = match (&args.scheme, args.duration) {
        (Some(id), _) => Some(id.clone()),
        (None, Some(_)) => Some(CUSTOM_SCHEME_ID.to_string()),
        (None, None) => None,
    };

    match selected {
        Some(id) => match calculator.on_scheme_change(&id).await {
            FetchOutcome::Failed(e) => {
                return Err(anyhow::Error::new(e).context(format!("Scheme {} could not be loaded", id)))
            }
            outcome => tracing::debug!(?outcome, "Scheme selection finished"),
        },
        None => {
            calculator.initialize().await;
        }
    }

    // Values given explicitly win over what the scheme filled in
    if let Some(rate) = &args.rate {
        calculator.on_input(Field::InterestRate, rate);
    }
    if let Some(fee) = &args.fee {
        calculator.on_input(Field::ProcessingFee, fee);
    }

    let form = calculator.form();
    if args.json {
        let metrics = form.metrics();
        let output = json!({
            "scheme": calculator.scheme(),
            "issue_date": form.value(Field::IssueDate),
            "due_date": form.value(Field::DueDate),
            "grace_period_end": form.value(Field::GracePeriodEnd),
            "metrics": metrics.map(|m| m.metrics),
            "maturity": metrics.and_then(|m| m.maturity),
            "gold": form.gold_limits(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if form.scheme_panel().is_visible() {
        println!("{}", form.scheme_panel());
    }
    if let Some(metrics) = form.metrics() {
        print!("{}", metrics);
    }
    Ok(())
}

fn run_accrual(args: AccrualArgs) -> Result<()> {
    if args.due_date < args.issue_date {
        bail!("Due date {} is before issue date {}", args.due_date, args.issue_date);
    }

    let today = args
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let principal = pawnshop_core::parse_amount(&args.principal);
    let rate = pawnshop_core::parse_number(&args.rate);
    let statement = accrual_statement(
        principal,
        rate,
        args.issue_date,
        args.due_date,
        today,
        args.no_interest_days,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&statement)?);
        return Ok(());
    }

    println!("As of {}", today);
    println!("Days Since Issue: {}", statement.days_since_issue);
    if statement.overdue {
        println!("Status: Overdue");
    } else {
        println!("Days Remaining: {}", statement.days_remaining);
    }
    println!("Months Elapsed: {}", statement.months_elapsed);
    println!("Interest Accrued: {}", format_inr(statement.interest_accrued));
    println!("Total Payable: {}", format_inr(statement.total_payable));
    Ok(())
}
