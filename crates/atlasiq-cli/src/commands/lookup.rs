use clap::Args;
use serde_json::{json, Value};

use atlasiq_core::config::ScoringConfig;
use atlasiq_core::normalization::normalize_country_code;
use atlasiq_core::risk::{RiskLookup, SectorRiskTable};

/// Arguments for the macro risk lookup
#[derive(Args)]
pub struct MacroRiskArgs {
    /// ISO alpha-2 code or English country name
    #[arg(long)]
    pub country: String,
}

/// Arguments for the sector risk lookup
#[derive(Args)]
pub struct SectorRiskArgs {
    /// NACE code (only the section letter is used)
    #[arg(long)]
    pub nace: String,
}

pub fn run_macro_risk(
    args: MacroRiskArgs,
    config: &ScoringConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let code = normalize_country_code(&args.country)
        .unwrap_or_else(|| args.country.trim().to_ascii_uppercase());
    let table = config.macro_lookup();

    Ok(json!({
        "result": {
            "country_code": code,
            "macro_risk_score": table.score_for(Some(code.as_str())),
            "in_table": table.covers(&code),
        }
    }))
}

pub fn run_sector_risk(
    args: SectorRiskArgs,
    config: &ScoringConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let table = config.sector_lookup()?;

    Ok(json!({
        "result": {
            "nace_code": args.nace,
            "section": SectorRiskTable::section(&args.nace),
            "sector_risk_score": table.score_for(Some(args.nace.as_str())),
            "in_table": table.covers(&args.nace),
        }
    }))
}
