//! Statement normalization: conversion into EUR, country code
//! standardisation, company profile cleanup and plausibility checks on
//! reported figures.

use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::statements::{CashFlowInput, FinancialStatementInput};
use crate::types::{round2, with_metadata, ComputationOutput, Currency};
use crate::{AtlasError, AtlasResult};

/// Tolerance on assets = liabilities + equity, as a fraction of assets.
const BALANCE_TOLERANCE: Decimal = dec!(0.01);

/// EBITDA margins above this (in %) are flagged as outliers.
const EBITDA_MARGIN_CEILING: Decimal = dec!(80);

/// Company descriptions are cut to this many characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Approximate EUR value of one unit of `currency`.
pub fn eur_rate(currency: &Currency) -> AtlasResult<Decimal> {
    match currency {
        Currency::EUR => Ok(Decimal::ONE),
        Currency::USD => Ok(dec!(0.92)),
        Currency::GBP => Ok(dec!(1.16)),
        Currency::CHF => Ok(dec!(1.05)),
        Currency::DKK => Ok(dec!(0.134)),
        Currency::SEK => Ok(dec!(0.088)),
        Currency::NOK => Ok(dec!(0.086)),
        Currency::Other(code) => Err(AtlasError::UnsupportedCurrency(code.clone())),
    }
}

/// Map a country name or code to its ISO alpha-2 code.
pub fn normalize_country_code(country: &str) -> Option<String> {
    let country = country.trim();
    if country.len() == 2 && country.chars().all(|c| c.is_ascii_uppercase()) {
        return Some(country.to_string());
    }
    let code = match country.to_ascii_lowercase().as_str() {
        "netherlands" => "NL",
        "belgium" => "BE",
        "luxembourg" => "LU",
        "germany" => "DE",
        "france" => "FR",
        "united kingdom" => "GB",
        _ => return None,
    };
    Some(code.to_string())
}

fn to_eur(field: &str, amount: Decimal, rate: Decimal) -> AtlasResult<Decimal> {
    amount
        .checked_mul(rate)
        .map(round2)
        .ok_or_else(|| AtlasError::InvalidInput {
            field: field.to_string(),
            reason: format!("{amount} overflows when converted to EUR"),
        })
}

/// Convert a statement reported in `currency` into EUR (2 dp) and check it
/// for internal consistency. Consistency issues are returned as warnings.
pub fn normalize_financial_statement(
    statement: &FinancialStatementInput,
    currency: Currency,
) -> AtlasResult<ComputationOutput<FinancialStatementInput>> {
    let start = Instant::now();
    let rate = eur_rate(&currency)?;

    let normalized = statement.try_map_amounts(|field, v| to_eur(field, v, rate))?;
    let warnings = validate_financial_statement(&normalized);
    debug!(
        fiscal_year = statement.fiscal_year,
        %currency,
        %rate,
        issues = warnings.len(),
        "financial statement normalized"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "source_currency": currency.to_string(),
        "eur_rate": rate,
        "rounding": "2 dp",
    });

    Ok(with_metadata(
        "Fixed-rate EUR conversion with statement consistency checks",
        &assumptions,
        warnings,
        elapsed,
        normalized,
    ))
}

/// Convert a cash flow statement reported in `currency` into EUR (2 dp).
pub fn normalize_cashflow_statement(
    cashflow: &CashFlowInput,
    currency: Currency,
) -> AtlasResult<CashFlowInput> {
    let rate = eur_rate(&currency)?;
    cashflow.try_map_amounts(|field, v| to_eur(field, v, rate))
}

/// Plausibility checks on one statement. Never fails; each issue found is
/// returned as a message. Revenue checks are skipped when revenue is zero,
/// and a check whose arithmetic leaves the decimal range is skipped.
pub fn validate_financial_statement(fs: &FinancialStatementInput) -> Vec<String> {
    let mut issues = Vec::new();
    let revenue = fs.revenue.filter(|r| !r.is_zero());

    if let (Some(revenue), Some(ebitda)) = (revenue, fs.ebitda) {
        if ebitda > revenue {
            issues.push(format!("EBITDA ({ebitda}) > Revenue ({revenue})"));
        }
        let margin = ebitda
            .checked_div(revenue)
            .and_then(|m| m.checked_mul(dec!(100)));
        if let Some(margin) = margin.filter(|m| *m > EBITDA_MARGIN_CEILING) {
            issues.push(format!("EBITDA margin unusually high: {}%", margin.round_dp(1)));
        }
    }

    if let (Some(revenue), Some(net_income)) = (revenue, fs.net_income) {
        if revenue
            .checked_mul(dec!(2))
            .is_some_and(|ceiling| net_income > ceiling)
        {
            issues.push(format!(
                "Net Income ({net_income}) suspiciously high vs Revenue ({revenue})"
            ));
        }
    }

    if let (Some(assets), Some(liabilities), Some(equity)) =
        (fs.total_assets, fs.total_liabilities, fs.total_equity)
    {
        let funding = liabilities.checked_add(equity);
        let gap = funding.and_then(|f| assets.checked_sub(f)).map(|g| g.abs());
        if let (Some(funding), Some(gap)) = (funding, gap) {
            if gap > (assets * BALANCE_TOLERANCE).abs() {
                issues.push(format!(
                    "Balance sheet doesn't balance: Assets={assets}, L+E={funding}"
                ));
            }
        }
    }

    issues
}

// ---------------------------------------------------------------------------
// Company profile
// ---------------------------------------------------------------------------

/// A company profile as received from a data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfoInput {
    pub name: Option<String>,
    /// Country name or ISO alpha-2 code.
    pub country: Option<String>,
    pub sector: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub is_listed: Option<bool>,
    pub ticker: Option<String>,
}

/// A cleaned company profile. Blank or unrecognised fields are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_listed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
}

/// Trim `value`, optionally cut it to `max_chars` characters, and drop it
/// when nothing is left.
pub fn clean_string(value: Option<&str>, max_chars: Option<usize>) -> Option<String> {
    let trimmed = value?.trim();
    let cleaned: String = match max_chars {
        Some(max) => trimmed.chars().take(max).collect(),
        None => trimmed.to_string(),
    };
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Clean a company profile. Listing status defaults to listed.
pub fn normalize_company_info(input: &CompanyInfoInput) -> CompanyInfo {
    let country_code = input.country.as_deref().and_then(normalize_country_code);
    if country_code.is_none() {
        if let Some(country) = input.country.as_deref() {
            debug!(country, "country not recognised; country code left empty");
        }
    }

    CompanyInfo {
        name: clean_string(input.name.as_deref(), None),
        country_code,
        sector: clean_string(input.sector.as_deref(), None),
        website: clean_string(input.website.as_deref(), None),
        description: clean_string(input.description.as_deref(), Some(DESCRIPTION_MAX_CHARS)),
        is_listed: input.is_listed.unwrap_or(true),
        ticker: clean_string(input.ticker.as_deref(), None),
    }
}
