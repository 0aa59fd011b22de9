use clap::Args;
use serde::Serialize;
use serde_json::Value;

use atlasiq_core::normalization::{
    normalize_cashflow_statement, normalize_company_info, normalize_financial_statement,
    CompanyInfoInput,
};
use atlasiq_core::statements::{CashFlowInput, FinancialStatementInput};
use atlasiq_core::{with_metadata, Currency};

use super::risk::StatementBundle;
use crate::input;

/// Arguments for statement normalization
#[derive(Args)]
pub struct NormalizeArgs {
    /// Path to JSON with `financial_statement` and optional `cashflow`;
    /// stdin if omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Currency the statements are reported in
    #[arg(long, default_value = "EUR")]
    pub currency: Currency,
}

/// Arguments for company profile normalization
#[derive(Args)]
pub struct NormalizeCompanyArgs {
    /// Path to company profile JSON; stdin if omitted
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Serialize)]
struct NormalizedStatements {
    financial_statement: FinancialStatementInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    cashflow: Option<CashFlowInput>,
}

pub fn run_normalize(args: NormalizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bundle: StatementBundle = input::read_input(args.input.as_deref(), "statement")?;

    let statement = normalize_financial_statement(&bundle.financial_statement, args.currency.clone())?;
    let cashflow = bundle
        .cashflow
        .as_ref()
        .map(|cf| normalize_cashflow_statement(cf, args.currency.clone()))
        .transpose()?;

    let output = with_metadata(
        &statement.methodology,
        &statement.assumptions,
        statement.warnings,
        statement.metadata.computation_time_us,
        NormalizedStatements {
            financial_statement: statement.result,
            cashflow,
        },
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_normalize_company(
    args: NormalizeCompanyArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let profile: CompanyInfoInput = input::read_input(args.input.as_deref(), "company profile")?;
    Ok(serde_json::to_value(normalize_company_info(&profile))?)
}
