//! Macro (country) and sector (NACE section) risk lookups.
//!
//! Both are static tables today. They sit behind [`RiskLookup`] so a source
//! backed by real indicator series can replace them without touching the
//! composite scorer.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Score;
use crate::{AtlasError, AtlasResult};

/// Score used for codes a lookup does not know.
pub const NEUTRAL_SCORE: Decimal = dec!(50);

/// A source of 0-100 risk scores keyed by a classification code.
pub trait RiskLookup: Send + Sync {
    /// Risk score for `code`, or `None` when the source has no opinion.
    fn score_for(&self, code: Option<&str>) -> Option<Score>;

    /// Whether `code` is explicitly covered rather than defaulted.
    fn covers(&self, _code: &str) -> bool {
        true
    }
}

impl<T: RiskLookup + ?Sized> RiskLookup for &T {
    fn score_for(&self, code: Option<&str>) -> Option<Score> {
        (**self).score_for(code)
    }

    fn covers(&self, code: &str) -> bool {
        (**self).covers(code)
    }
}

impl<T: RiskLookup + ?Sized> RiskLookup for Box<T> {
    fn score_for(&self, code: Option<&str>) -> Option<Score> {
        (**self).score_for(code)
    }

    fn covers(&self, code: &str) -> bool {
        (**self).covers(code)
    }
}

// ---------------------------------------------------------------------------
// Default tables
// ---------------------------------------------------------------------------

/// Country risk by ISO 3166 alpha-2 code.
pub fn default_macro_table() -> BTreeMap<String, Score> {
    [
        ("NL", dec!(25)), // Netherlands
        ("LU", dec!(20)), // Luxembourg
        ("BE", dec!(30)), // Belgium
        ("DE", dec!(25)), // Germany
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Sector risk by NACE Rev. 2 section letter.
pub fn default_sector_table() -> BTreeMap<String, Score> {
    [
        ("A", dec!(40)), // Agriculture, forestry and fishing
        ("B", dec!(55)), // Mining and quarrying
        ("C", dec!(35)), // Manufacturing
        ("D", dec!(30)), // Electricity, gas, steam
        ("E", dec!(30)), // Water supply, waste management
        ("F", dec!(45)), // Construction
        ("G", dec!(35)), // Wholesale and retail trade
        ("H", dec!(50)), // Transportation and storage
        ("I", dec!(45)), // Accommodation and food service
        ("J", dec!(30)), // Information and communication
        ("K", dec!(40)), // Financial and insurance
        ("L", dec!(25)), // Real estate
        ("M", dec!(30)), // Professional, scientific, technical
        ("N", dec!(35)), // Administrative and support
        ("P", dec!(20)), // Education
        ("Q", dec!(20)), // Human health and social work
        ("R", dec!(45)), // Arts, entertainment and recreation
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

// ---------------------------------------------------------------------------
// Table lookups
// ---------------------------------------------------------------------------

/// Country code -> macro risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroRiskTable {
    scores: BTreeMap<String, Score>,
    fallback: Score,
}

impl MacroRiskTable {
    pub fn new(scores: BTreeMap<String, Score>, fallback: Score) -> Self {
        let scores = scores
            .into_iter()
            .map(|(k, v)| (Self::key(&k), v))
            .collect();
        Self { scores, fallback }
    }

    fn key(code: &str) -> String {
        code.trim().to_ascii_uppercase()
    }
}

impl Default for MacroRiskTable {
    fn default() -> Self {
        Self::new(default_macro_table(), NEUTRAL_SCORE)
    }
}

impl RiskLookup for MacroRiskTable {
    fn score_for(&self, code: Option<&str>) -> Option<Score> {
        let score = code
            .and_then(|c| self.scores.get(&Self::key(c)))
            .copied()
            .unwrap_or(self.fallback);
        Some(score)
    }

    fn covers(&self, code: &str) -> bool {
        self.scores.contains_key(&Self::key(code))
    }
}

/// NACE code -> sector risk score, keyed on the section letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRiskTable {
    scores: BTreeMap<String, Score>,
    fallback: Score,
}

impl SectorRiskTable {
    /// Build a table keyed on section letters. Keys are trimmed and
    /// uppercased; anything other than a single letter is rejected.
    pub fn new(scores: BTreeMap<String, Score>, fallback: Score) -> AtlasResult<Self> {
        let scores = scores
            .into_iter()
            .map(|(k, v)| Self::section_key(&k).map(|s| (s, v)))
            .collect::<AtlasResult<_>>()?;
        Ok(Self { scores, fallback })
    }

    /// The broad section: first character of the code, uppercased.
    pub fn section(nace_code: &str) -> Option<String> {
        nace_code
            .trim()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase().to_string())
    }

    pub(crate) fn section_key(key: &str) -> AtlasResult<String> {
        let mut chars = key.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase().to_string()),
            _ => Err(AtlasError::InvalidInput {
                field: format!("sector_table.{key}"),
                reason: "Sector keys must be a single NACE section letter.".into(),
            }),
        }
    }
}

impl Default for SectorRiskTable {
    fn default() -> Self {
        Self {
            scores: default_sector_table(),
            fallback: NEUTRAL_SCORE,
        }
    }
}

impl RiskLookup for SectorRiskTable {
    fn score_for(&self, code: Option<&str>) -> Option<Score> {
        let score = code
            .and_then(Self::section)
            .and_then(|s| self.scores.get(&s))
            .copied()
            .unwrap_or(self.fallback);
        Some(score)
    }

    fn covers(&self, code: &str) -> bool {
        Self::section(code).is_some_and(|s| self.scores.contains_key(&s))
    }
}
