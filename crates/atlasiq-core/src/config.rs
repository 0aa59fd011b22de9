//! Scoring configuration. `ScoringConfig::default()` is the production
//! model; files may override any subset of it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::risk::composite::{RiskThresholds, RiskWeights};
use crate::risk::lookup::{
    default_macro_table, default_sector_table, MacroRiskTable, SectorRiskTable, NEUTRAL_SCORE,
};
use crate::types::Score;
use crate::{AtlasError, AtlasResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: RiskWeights,
    pub thresholds: RiskThresholds,
    /// Substituted for unknown codes and absent sub-scores.
    pub neutral_score: Score,
    /// Country code -> macro risk score.
    pub macro_table: BTreeMap<String, Score>,
    /// NACE section letter -> sector risk score.
    pub sector_table: BTreeMap<String, Score>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            thresholds: RiskThresholds::default(),
            neutral_score: NEUTRAL_SCORE,
            macro_table: default_macro_table(),
            sector_table: default_sector_table(),
        }
    }
}

impl ScoringConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json_str(s: &str) -> AtlasResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AtlasResult<()> {
        self.weights.validate()?;
        self.thresholds.validate()?;
        check_score("neutral_score", self.neutral_score)?;
        for (code, score) in &self.macro_table {
            check_score(&format!("macro_table.{code}"), *score)?;
        }
        for (section, score) in &self.sector_table {
            SectorRiskTable::section_key(section)?;
            check_score(&format!("sector_table.{section}"), *score)?;
        }
        Ok(())
    }

    pub fn macro_lookup(&self) -> MacroRiskTable {
        MacroRiskTable::new(self.macro_table.clone(), self.neutral_score)
    }

    pub fn sector_lookup(&self) -> AtlasResult<SectorRiskTable> {
        SectorRiskTable::new(self.sector_table.clone(), self.neutral_score)
    }
}

fn check_score(field: &str, score: Decimal) -> AtlasResult<()> {
    if score < Decimal::ZERO || score > dec!(100) {
        return Err(AtlasError::InvalidInput {
            field: field.into(),
            reason: format!("Score must lie in [0, 100], got {score}."),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::lookup::RiskLookup;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c = ScoringConfig::from_json_str(r#"{"thresholds": {"low": 25}}"#).unwrap();
        assert_eq!(c.thresholds.low, dec!(25));
        assert_eq!(c.thresholds.medium, dec!(50));
        assert_eq!(c.weights, RiskWeights::default());
        assert_eq!(c.macro_table.get("NL"), Some(&dec!(25)));
    }

    #[test]
    fn test_table_override_replaces_table() {
        let c = ScoringConfig::from_json_str(r#"{"macro_table": {"FR": 35}}"#).unwrap();
        let lookup = c.macro_lookup();
        assert_eq!(lookup.score_for(Some("FR")), Some(dec!(35)));
        assert_eq!(lookup.score_for(Some("NL")), Some(dec!(50)));
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let err = ScoringConfig::from_json_str(r#"{"sector_table": {"C": 135}}"#).unwrap_err();
        match err {
            AtlasError::InvalidInput { field, .. } => assert_eq!(field, "sector_table.C"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_multi_letter_sector_key_rejected() {
        assert!(ScoringConfig::from_json_str(r#"{"sector_table": {"C10": 30}}"#).is_err());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            ScoringConfig::from_json_str("{not json"),
            Err(AtlasError::SerializationError(_))
        ));
    }
}
