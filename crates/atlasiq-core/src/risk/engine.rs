//! Company risk scoring: macro, sector and financial health risk combined
//! into one weighted 0-100 score and a category.
//!
//! The engine is a pure function of its inputs and the injected calculation
//! date. Fetching statements and persisting results belong to the caller.

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::composite::{composite_score, RiskCategory, RiskThresholds, RiskWeights};
use super::health::{breakdown_from_ratios, HealthBreakdown};
use super::lookup::{MacroRiskTable, RiskLookup, SectorRiskTable, NEUTRAL_SCORE};
use super::ratios::{FinancialRatios, RatioSet};
use crate::config::ScoringConfig;
use crate::statements::{CashFlowInput, FinancialStatementInput};
use crate::types::{with_metadata, ComputationOutput, Score};
use crate::{AtlasError, AtlasResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Everything the caller has fetched for one (company, fiscal year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRequest {
    pub company_id: i64,
    /// ISO alpha-2 country code; unknown codes score neutral.
    pub country_code: String,
    /// NACE classification code; only the section letter is used.
    #[serde(default, alias = "nace_code")]
    pub sector_code: Option<String>,
    pub fiscal_year: i32,
    #[serde(default)]
    pub financial_statement: Option<FinancialStatementInput>,
    #[serde(default)]
    pub cashflow: Option<CashFlowInput>,
}

/// A computed risk score, shaped for persistence as one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreResult {
    pub company_id: i64,
    pub calculation_date: NaiveDate,
    pub fiscal_year: i32,
    pub macro_risk_score: Option<Score>,
    pub sector_risk_score: Option<Score>,
    pub financial_health_score: Score,
    pub overall_risk_score: Score,
    pub risk_category: RiskCategory,
    #[serde(flatten)]
    pub ratios: FinancialRatios,
}

/// The score plus the detail behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub result: RiskScoreResult,
    pub breakdown: HealthBreakdown,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless scorer, generic over its macro and sector score sources.
#[derive(Debug, Clone)]
pub struct RiskScoringEngine<M = MacroRiskTable, S = SectorRiskTable> {
    macro_lookup: M,
    sector_lookup: S,
    weights: RiskWeights,
    thresholds: RiskThresholds,
    neutral_score: Score,
}

impl Default for RiskScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskScoringEngine {
    /// The table-backed engine with the default model.
    pub fn new() -> Self {
        Self::with_lookups(MacroRiskTable::default(), SectorRiskTable::default())
    }

    /// Build the table-backed engine from a validated configuration.
    pub fn from_config(config: &ScoringConfig) -> AtlasResult<Self> {
        config.validate()?;
        Ok(Self {
            macro_lookup: config.macro_lookup(),
            sector_lookup: config.sector_lookup()?,
            weights: config.weights.clone(),
            thresholds: config.thresholds.clone(),
            neutral_score: config.neutral_score,
        })
    }
}

impl<M: RiskLookup, S: RiskLookup> RiskScoringEngine<M, S> {
    /// Engine with custom score sources and the default weights.
    pub fn with_lookups(macro_lookup: M, sector_lookup: S) -> Self {
        Self {
            macro_lookup,
            sector_lookup,
            weights: RiskWeights::default(),
            thresholds: RiskThresholds::default(),
            neutral_score: NEUTRAL_SCORE,
        }
    }

    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Score one company for one fiscal year as of `calculation_date`.
    ///
    /// Fails only when no financial statement for `request.fiscal_year` was
    /// supplied. Everything else degrades to neutral or absent values, each
    /// noted in the returned warnings.
    pub fn calculate_risk(
        &self,
        request: &RiskRequest,
        calculation_date: NaiveDate,
    ) -> AtlasResult<RiskAssessment> {
        let mut warnings: Vec<String> = Vec::new();

        let statement = request
            .financial_statement
            .as_ref()
            .filter(|fs| fs.fiscal_year == request.fiscal_year)
            .ok_or_else(|| {
                warn!(
                    company_id = request.company_id,
                    fiscal_year = request.fiscal_year,
                    "no financial statement for requested year"
                );
                AtlasError::MissingRequiredData {
                    company_id: request.company_id,
                    fiscal_year: request.fiscal_year,
                }
            })?;

        let cashflow = match &request.cashflow {
            Some(cf) if cf.fiscal_year == request.fiscal_year => Some(cf),
            Some(cf) => {
                warnings.push(format!(
                    "Cash flow statement is for fiscal year {}, not {}; ignored.",
                    cf.fiscal_year, request.fiscal_year
                ));
                None
            }
            None => {
                warnings.push(format!(
                    "No cash flow statement for fiscal year {}.",
                    request.fiscal_year
                ));
                None
            }
        };

        // -- Sub-scores ---------------------------------------------------------
        let macro_risk = self.macro_score(&request.country_code, &mut warnings);
        let sector_risk = self.sector_score(request.sector_code.as_deref(), &mut warnings);

        let ratio_set = RatioSet::derive(statement, cashflow);
        let breakdown = breakdown_from_ratios(&ratio_set, cashflow);
        for (name, bucket) in breakdown.buckets() {
            if !bucket.assessed {
                warnings.push(format!("{name}: {}", bucket.rationale));
            }
        }

        let ratios = ratio_set.display();
        let omitted = ratios.omitted();
        if !omitted.is_empty() {
            warnings.push(format!(
                "Ratios not computable from inputs: {}.",
                omitted.join(", ")
            ));
        }

        // -- Composite ----------------------------------------------------------
        let overall = composite_score(
            macro_risk,
            sector_risk,
            breakdown.total,
            &self.weights,
            self.neutral_score,
        );
        let category = RiskCategory::from_score(overall, &self.thresholds);

        debug!(
            company_id = request.company_id,
            fiscal_year = request.fiscal_year,
            macro_risk = ?macro_risk,
            sector_risk = ?sector_risk,
            financial_health = %breakdown.total,
            overall = %overall,
            category = %category,
            "risk score calculated"
        );

        let result = RiskScoreResult {
            company_id: request.company_id,
            calculation_date,
            fiscal_year: request.fiscal_year,
            macro_risk_score: macro_risk,
            sector_risk_score: sector_risk,
            financial_health_score: breakdown.total,
            overall_risk_score: overall,
            risk_category: category,
            ratios,
        };

        Ok(RiskAssessment {
            result,
            breakdown,
            warnings,
        })
    }

    /// [`calculate_risk`](Self::calculate_risk) stamped with today's UTC date.
    pub fn calculate_risk_today(&self, request: &RiskRequest) -> AtlasResult<RiskAssessment> {
        self.calculate_risk(request, Utc::now().date_naive())
    }

    fn macro_score(&self, country_code: &str, warnings: &mut Vec<String>) -> Option<Score> {
        let score = self.macro_lookup.score_for(Some(country_code));
        match score {
            None => warnings.push(format!(
                "No macro risk score for country '{country_code}'; neutral {} used in composite.",
                self.neutral_score
            )),
            Some(s) if !self.macro_lookup.covers(country_code) => warnings.push(format!(
                "Country '{country_code}' not in macro risk table; default score {s} applied."
            )),
            Some(_) => {}
        }
        score
    }

    fn sector_score(&self, sector_code: Option<&str>, warnings: &mut Vec<String>) -> Option<Score> {
        let score = self.sector_lookup.score_for(sector_code);
        match (sector_code, score) {
            (_, None) => warnings.push(format!(
                "No sector risk score; neutral {} used in composite.",
                self.neutral_score
            )),
            (None, Some(s)) => {
                warnings.push(format!("No NACE code; default sector score {s} applied."))
            }
            (Some(code), Some(s)) if !self.sector_lookup.covers(code) => warnings.push(format!(
                "NACE code '{code}' not in sector risk table; default score {s} applied."
            )),
            _ => {}
        }
        score
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score a company with the table-backed engine built from `config`.
///
/// `calculation_date` defaults to today (UTC) when not supplied.
pub fn calculate_company_risk(
    request: &RiskRequest,
    calculation_date: Option<NaiveDate>,
    config: &ScoringConfig,
) -> AtlasResult<ComputationOutput<RiskScoreResult>> {
    let start = Instant::now();

    let engine = RiskScoringEngine::from_config(config)?;
    let date = calculation_date.unwrap_or_else(|| Utc::now().date_naive());
    let assessment = engine.calculate_risk(request, date)?;

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "weights": config.weights,
        "thresholds": config.thresholds,
        "neutral_score": config.neutral_score,
        "health_breakdown": assessment.breakdown,
    });

    Ok(with_metadata(
        "Weighted composite: macro 30% / sector 20% / financial health 50% (defaults)",
        &assumptions,
        assessment.warnings,
        elapsed,
        assessment.result,
    ))
}
