pub mod composite;
pub mod engine;
pub mod health;
pub mod lookup;
pub mod ratios;

pub use composite::{composite_score, RiskCategory, RiskThresholds, RiskWeights};
pub use engine::{
    calculate_company_risk, RiskAssessment, RiskRequest, RiskScoreResult, RiskScoringEngine,
};
pub use health::{financial_health_score, score_financial_health, BucketScore, HealthBreakdown};
pub use lookup::{MacroRiskTable, RiskLookup, SectorRiskTable, NEUTRAL_SCORE};
pub use ratios::{calculate_financial_ratios, FinancialRatios};
