//! Weighted composite of the macro, sector and financial health scores,
//! and its bucketing into risk categories.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{round2, Score};
use crate::{AtlasError, AtlasResult};

// ---------------------------------------------------------------------------
// Weights and thresholds
// ---------------------------------------------------------------------------

/// Weights applied to the three sub-scores. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub macro_weight: Decimal,
    pub sector_weight: Decimal,
    pub financial_weight: Decimal,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            macro_weight: dec!(0.30),
            sector_weight: dec!(0.20),
            financial_weight: dec!(0.50),
        }
    }
}

impl RiskWeights {
    pub fn validate(&self) -> AtlasResult<()> {
        for (field, w) in [
            ("weights.macro_weight", self.macro_weight),
            ("weights.sector_weight", self.sector_weight),
            ("weights.financial_weight", self.financial_weight),
        ] {
            if w < Decimal::ZERO {
                return Err(AtlasError::InvalidInput {
                    field: field.into(),
                    reason: "Weight cannot be negative.".into(),
                });
            }
        }
        let sum = self.macro_weight + self.sector_weight + self.financial_weight;
        if sum != Decimal::ONE {
            return Err(AtlasError::InvalidInput {
                field: "weights".into(),
                reason: format!("Weights must sum to 1, got {sum}."),
            });
        }
        Ok(())
    }
}

/// Lower bounds of the Medium, High and Critical categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub low: Score,
    pub medium: Score,
    pub high: Score,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: dec!(30),
            medium: dec!(50),
            high: dec!(70),
        }
    }
}

impl RiskThresholds {
    pub fn validate(&self) -> AtlasResult<()> {
        if !(Decimal::ZERO < self.low && self.low < self.medium && self.medium < self.high)
            || self.high > dec!(100)
        {
            return Err(AtlasError::InvalidInput {
                field: "thresholds".into(),
                reason: format!(
                    "Thresholds must be strictly ascending within (0, 100]: low={}, medium={}, high={}.",
                    self.low, self.medium, self.high
                ),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskCategory {
    /// Bucket a 0-100 score. Each threshold is the inclusive lower bound of
    /// the next category up.
    pub fn from_score(score: Score, thresholds: &RiskThresholds) -> Self {
        if score < thresholds.low {
            Self::Low
        } else if score < thresholds.medium {
            Self::Medium
        } else if score < thresholds.high {
            Self::High
        } else {
            Self::Critical
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Composite
// ---------------------------------------------------------------------------

/// Weighted overall risk, rounded to 2 dp. Absent macro or sector scores
/// are replaced by `neutral` before weighting.
pub fn composite_score(
    macro_risk: Option<Score>,
    sector_risk: Option<Score>,
    financial_health: Score,
    weights: &RiskWeights,
    neutral: Score,
) -> Score {
    let weighted = macro_risk.unwrap_or(neutral) * weights.macro_weight
        + sector_risk.unwrap_or(neutral) * weights.sector_weight
        + financial_health * weights.financial_weight;
    round2(weighted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::lookup::NEUTRAL_SCORE;

    #[test]
    fn test_category_boundaries() {
        let t = RiskThresholds::default();
        assert_eq!(RiskCategory::from_score(dec!(29.99), &t), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(dec!(30.0), &t), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(dec!(49.99), &t), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(dec!(50.0), &t), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(dec!(70.0), &t), RiskCategory::Critical);
        assert_eq!(RiskCategory::from_score(dec!(0), &t), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(dec!(100), &t), RiskCategory::Critical);
    }

    #[test]
    fn test_composite_with_all_sub_scores() {
        // 0.30×25 + 0.20×35 + 0.50×75 = 52
        let s = composite_score(
            Some(dec!(25)),
            Some(dec!(35)),
            dec!(75),
            &RiskWeights::default(),
            NEUTRAL_SCORE,
        );
        assert_eq!(s, dec!(52.00));
    }

    #[test]
    fn test_composite_substitutes_neutral() {
        // 0.30×50 + 0.20×50 + 0.50×10 = 30
        let s = composite_score(None, None, dec!(10), &RiskWeights::default(), NEUTRAL_SCORE);
        assert_eq!(s, dec!(30));
    }

    #[test]
    fn test_composite_rounds_to_two_places() {
        let w = RiskWeights {
            macro_weight: dec!(0.333),
            sector_weight: dec!(0.333),
            financial_weight: dec!(0.334),
        };
        let s = composite_score(Some(dec!(10.01)), Some(dec!(20)), dec!(33), &w, NEUTRAL_SCORE);
        // 3.33333 + 6.66 + 11.022 = 21.01533
        assert_eq!(s, dec!(21.02));
    }

    #[test]
    fn test_weights_validation() {
        assert!(RiskWeights::default().validate().is_ok());
        let bad = RiskWeights {
            macro_weight: dec!(0.5),
            ..RiskWeights::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(AtlasError::InvalidInput { field, .. }) if field == "weights"
        ));
        let negative = RiskWeights {
            macro_weight: dec!(-0.1),
            sector_weight: dec!(0.6),
            financial_weight: dec!(0.5),
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_thresholds_validation() {
        assert!(RiskThresholds::default().validate().is_ok());
        let bad = RiskThresholds {
            low: dec!(60),
            medium: dec!(50),
            high: dec!(70),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&RiskCategory::Critical).unwrap();
        assert_eq!(json, "\"Critical\"");
        assert_eq!(RiskCategory::Medium.to_string(), "Medium");
    }
}
