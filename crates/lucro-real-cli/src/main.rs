mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use lucro_real_core::format::Locale;
use std::process;

use commands::alerts::AlertsArgs;
use commands::analysis::SnapshotArgs;
use commands::diagnosis::DiagnoseArgs;
use commands::intake::{IntakeArgs, LevelArgs};
use commands::metrics::{MetricsArgs, SimulatePriceArgs};

/// Small-business profit self-diagnosis
#[derive(Parser)]
#[command(
    name = "lucro",
    version,
    about = "Small-business profit self-diagnosis",
    long_about = "Computes the real profit of a small business (after fixed costs, \
                  variable costs and the owner's pró-labore), its break-even point, \
                  financial risk and growth capacity, and flags the ways owners fool \
                  themselves about their numbers."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Diagnosis settings (minimum wage, locale, currency) as JSON or YAML
    #[arg(long, global = true)]
    config: Option<String>,

    /// Locale for amounts and percentages (pt-BR, en-US, es-ES, de-DE); overrides --config
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Full diagnosis: profit, break-even, health, risk, growth and alerts
    Diagnose(DiagnoseArgs),
    /// Real profit, margin and break-even of a business
    Metrics(MetricsArgs),
    /// Simulate the effect of a price change on profit
    SimulatePrice(SimulatePriceArgs),
    /// Run the self-deception detector over one or two months
    Alerts(AlertsArgs),
    /// Score financial risk for a month
    Risk(SnapshotArgs),
    /// How much the business can grow from its own profit
    Growth(SnapshotArgs),
    /// Convert a raw onboarding form into a business
    Intake(IntakeArgs),
    /// Business level for accumulated points
    Level(LevelArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let config = match config::resolve(cli.config.as_deref(), cli.locale) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Diagnose(args) => commands::diagnosis::run_diagnose(args, config.as_ref()),
        Commands::Metrics(args) => commands::metrics::run_metrics(args),
        Commands::SimulatePrice(args) => commands::metrics::run_simulate_price(args),
        Commands::Alerts(args) => commands::alerts::run_alerts(args, config.as_ref()),
        Commands::Risk(args) => commands::analysis::run_risk(args, config.as_ref()),
        Commands::Growth(args) => commands::analysis::run_growth(args),
        Commands::Intake(args) => commands::intake::run_intake(args),
        Commands::Level(args) => commands::intake::run_level(args),
        Commands::Version => {
            println!("lucro {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, config.as_ref());
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
