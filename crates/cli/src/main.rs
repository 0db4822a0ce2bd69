//! Loan calculator entry point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use pawnshop_config::{load_settings, Settings};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Priority: env vars > config/{env}.toml > config/default.toml > defaults
    let settings = match load_settings(args.env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&settings);
    tracing::debug!(
        environment = ?settings.environment,
        config_env = args.env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    cli::run(args.command, &settings).await
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("pawnshop={level},loan_calc={level},warn").into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    // Logs go to stderr so stdout stays clean for summaries and JSON
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
