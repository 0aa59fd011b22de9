mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::lookup::{MacroRiskArgs, SectorRiskArgs};
use commands::normalize::{NormalizeArgs, NormalizeCompanyArgs};
use commands::risk::{RiskScoreArgs, StatementArgs};

/// Company risk scoring from macro, sector and financial statement data
#[derive(Parser)]
#[command(
    name = "atlasiq",
    version,
    about = "Company risk scoring from macro, sector and financial statement data",
    long_about = "Scores a company's risk for one fiscal year by combining country (macro) \
                  risk, NACE sector risk and a financial health score derived from its \
                  statements. Also derives financial ratios and normalizes statements to EUR."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Scoring configuration file (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the composite risk score for a company and fiscal year
    RiskScore(RiskScoreArgs),
    /// Derive financial ratios from a statement
    Ratios(StatementArgs),
    /// Score financial health bucket by bucket
    Health(StatementArgs),
    /// Convert a statement to EUR and check its consistency
    Normalize(NormalizeArgs),
    /// Clean a company profile and resolve its country code
    NormalizeCompany(NormalizeCompanyArgs),
    /// Look up the macro risk score for a country
    MacroRisk(MacroRiskArgs),
    /// Look up the sector risk score for a NACE code
    SectorRisk(SectorRiskArgs),
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

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match input::config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::RiskScore(args) => commands::risk::run_risk_score(args, &config),
        Commands::Ratios(args) => commands::risk::run_ratios(args),
        Commands::Health(args) => commands::risk::run_health(args),
        Commands::Normalize(args) => commands::normalize::run_normalize(args),
        Commands::NormalizeCompany(args) => commands::normalize::run_normalize_company(args),
        Commands::MacroRisk(args) => commands::lookup::run_macro_risk(args, &config),
        Commands::SectorRisk(args) => commands::lookup::run_sector_risk(args, &config),
        Commands::Version => {
            println!("atlasiq {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
