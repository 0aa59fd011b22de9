use chrono::NaiveDate;
use clap::Args;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Instant;

use atlasiq_core::config::ScoringConfig;
use atlasiq_core::risk::{
    calculate_company_risk, calculate_financial_ratios, score_financial_health, RiskRequest,
};
use atlasiq_core::statements::{CashFlowInput, FinancialStatementInput};
use atlasiq_core::with_metadata;

use crate::input;

/// Arguments for the composite risk score
#[derive(Args)]
pub struct RiskScoreArgs {
    /// Path to JSON risk request (company_id, country_code, nace_code,
    /// fiscal_year, financial_statement, cashflow); stdin if omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Calculation date stamped on the result (YYYY-MM-DD, default today UTC)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Override the request's country code
    #[arg(long)]
    pub country: Option<String>,

    /// Override the request's NACE code
    #[arg(long)]
    pub nace: Option<String>,
}

/// Arguments for commands that take one year's statements
#[derive(Args)]
pub struct StatementArgs {
    /// Path to JSON with `financial_statement` and optional `cashflow`;
    /// stdin if omitted
    #[arg(long)]
    pub input: Option<String>,
}

/// One fiscal year of statements as read from the command line.
#[derive(Debug, Deserialize)]
pub struct StatementBundle {
    pub financial_statement: FinancialStatementInput,
    #[serde(default)]
    pub cashflow: Option<CashFlowInput>,
}

pub fn run_risk_score(
    args: RiskScoreArgs,
    config: &ScoringConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: RiskRequest = input::read_input(args.input.as_deref(), "risk request")?;
    if let Some(country) = args.country {
        request.country_code = country;
    }
    if let Some(nace) = args.nace {
        request.sector_code = Some(nace);
    }

    let output = calculate_company_risk(&request, args.as_of, config)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_ratios(args: StatementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let bundle: StatementBundle = input::read_input(args.input.as_deref(), "statement")?;

    let ratios = calculate_financial_ratios(&bundle.financial_statement, bundle.cashflow.as_ref());
    let warnings = ratios
        .omitted()
        .into_iter()
        .map(|name| format!("{name} not computable from inputs"))
        .collect();

    let output = with_metadata(
        "Financial ratios (2 dp, positive denominators only)",
        &json!({ "quick_ratio_inventory": "absent inventory treated as 0" }),
        warnings,
        start.elapsed().as_micros() as u64,
        ratios,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_health(args: StatementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let bundle: StatementBundle = input::read_input(args.input.as_deref(), "statement")?;

    let breakdown = score_financial_health(&bundle.financial_statement, bundle.cashflow.as_ref());
    let warnings = breakdown
        .buckets()
        .into_iter()
        .filter(|(_, b)| !b.assessed)
        .map(|(name, b)| format!("{name}: {}", b.rationale))
        .collect();

    let output = with_metadata(
        "Financial health: profitability 20 / leverage 30 / liquidity 20 / cash flow 20 / solvency 10",
        &json!({ "missing_profitability_points": 10, "other_missing_buckets": 0 }),
        warnings,
        start.elapsed().as_micros() as u64,
        breakdown,
    );
    Ok(serde_json::to_value(output)?)
}
