//! Financial health scoring: five rule buckets summing to at most 100
//! risk points.
//!
//! | Bucket        | Max | Signal                          |
//! |---------------|-----|---------------------------------|
//! | Profitability | 20  | net margin                      |
//! | Leverage      | 30  | long-term debt / EBITDA         |
//! | Liquidity     | 20  | current ratio                   |
//! | Cash flow     | 20  | operating and free cash flow    |
//! | Solvency      | 10  | equity / total assets           |
//!
//! Missing profitability data scores a flat 10 (medium risk); every other
//! bucket scores 0 when it cannot be assessed. A quotient that overflows the
//! decimal range counts as not assessable.
//!
//! A reported zero is scored, not treated as missing. Zero current assets
//! give a current ratio of 0 (20 points), zero equity an equity ratio of 0%
//! (10 points), and zero operating cash flow with negative free cash flow
//! 10 points. Only a zero denominator makes a bucket unassessable.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ratios::RatioSet;
use crate::statements::{CashFlowInput, FinancialStatementInput};
use crate::types::Score;

/// Points charged when profitability cannot be measured.
pub const MISSING_PROFITABILITY_POINTS: Decimal = dec!(10);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Points awarded by one bucket, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketScore {
    pub points: Score,
    pub max_points: Score,
    /// False when the inputs this bucket needs were absent.
    pub assessed: bool,
    pub rationale: String,
}

/// Per-bucket view of a financial health score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthBreakdown {
    pub profitability: BucketScore,
    pub leverage: BucketScore,
    pub liquidity: BucketScore,
    pub cash_flow: BucketScore,
    pub solvency: BucketScore,
    /// Sum of bucket points, 0-100.
    pub total: Score,
}

impl HealthBreakdown {
    pub fn buckets(&self) -> [(&'static str, &BucketScore); 5] {
        [
            ("profitability", &self.profitability),
            ("leverage", &self.leverage),
            ("liquidity", &self.liquidity),
            ("cash_flow", &self.cash_flow),
            ("solvency", &self.solvency),
        ]
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Financial health risk for one fiscal year, 0-100 (higher = riskier).
pub fn financial_health_score(
    fs: &FinancialStatementInput,
    cf: Option<&CashFlowInput>,
) -> Score {
    score_financial_health(fs, cf).total
}

/// Score every bucket and return the full breakdown.
pub fn score_financial_health(
    fs: &FinancialStatementInput,
    cf: Option<&CashFlowInput>,
) -> HealthBreakdown {
    breakdown_from_ratios(&RatioSet::derive(fs, cf), cf)
}

pub(crate) fn breakdown_from_ratios(
    ratios: &RatioSet,
    cf: Option<&CashFlowInput>,
) -> HealthBreakdown {
    let profitability = profitability_bucket(ratios.net_margin.map(|q| q.value));
    let leverage = leverage_bucket(ratios.debt_to_ebitda.map(|q| q.value));
    let liquidity = liquidity_bucket(ratios.current_ratio.map(|q| q.value));
    let cash_flow = cash_flow_bucket(cf);
    let solvency = solvency_bucket(ratios.equity_ratio.map(|q| q.value));

    let total = (profitability.points
        + leverage.points
        + liquidity.points
        + cash_flow.points
        + solvency.points)
        .clamp(Decimal::ZERO, dec!(100));

    debug!(
        profitability = %profitability.points,
        leverage = %leverage.points,
        liquidity = %liquidity.points,
        cash_flow = %cash_flow.points,
        solvency = %solvency.points,
        total = %total,
        "financial health scored"
    );

    HealthBreakdown {
        profitability,
        leverage,
        liquidity,
        cash_flow,
        solvency,
        total,
    }
}

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

fn assessed(points: Decimal, max_points: Decimal, rationale: String) -> BucketScore {
    BucketScore {
        points,
        max_points,
        assessed: true,
        rationale,
    }
}

fn not_assessed(points: Decimal, max_points: Decimal, rationale: &str) -> BucketScore {
    BucketScore {
        points,
        max_points,
        assessed: false,
        rationale: rationale.to_string(),
    }
}

fn profitability_bucket(net_margin: Option<Decimal>) -> BucketScore {
    let max = dec!(20);
    let Some(m) = net_margin else {
        return not_assessed(
            MISSING_PROFITABILITY_POINTS,
            max,
            "Net margin not measurable (net income or revenue missing, or revenue zero); scored as medium risk",
        );
    };
    let points = match m {
        m if m < dec!(-10) => dec!(20),
        m if m < Decimal::ZERO => dec!(15),
        m if m < dec!(5) => dec!(10),
        m if m < dec!(10) => dec!(5),
        _ => Decimal::ZERO,
    };
    assessed(points, max, format!("Net margin {}%", m.round_dp(2)))
}

fn leverage_bucket(debt_to_ebitda: Option<Decimal>) -> BucketScore {
    let max = dec!(30);
    let Some(l) = debt_to_ebitda else {
        return not_assessed(
            Decimal::ZERO,
            max,
            "Long-term debt or EBITDA missing (or EBITDA zero); leverage not assessed",
        );
    };
    let points = match l {
        l if l > dec!(5) => dec!(30),
        l if l > dec!(3) => dec!(20),
        l if l > dec!(2) => dec!(10),
        _ => Decimal::ZERO,
    };
    assessed(points, max, format!("Debt/EBITDA {}x", l.round_dp(2)))
}

fn liquidity_bucket(current_ratio: Option<Decimal>) -> BucketScore {
    let max = dec!(20);
    let Some(c) = current_ratio else {
        return not_assessed(
            Decimal::ZERO,
            max,
            "Current assets or current liabilities missing; liquidity not assessed",
        );
    };
    let points = match c {
        c if c < dec!(0.8) => dec!(20),
        c if c < dec!(1.0) => dec!(15),
        c if c < dec!(1.2) => dec!(10),
        _ => Decimal::ZERO,
    };
    assessed(points, max, format!("Current ratio {}x", c.round_dp(2)))
}

fn cash_flow_bucket(cf: Option<&CashFlowInput>) -> BucketScore {
    let max = dec!(20);
    let Some((ocf, fcf)) = cf.and_then(|c| c.operating_cashflow.map(|o| (o, c.free_cashflow)))
    else {
        return not_assessed(
            Decimal::ZERO,
            max,
            "Operating cash flow missing; cash flow not assessed",
        );
    };
    if ocf < Decimal::ZERO {
        return assessed(dec!(20), max, format!("Negative operating cash flow {ocf}"));
    }
    match fcf {
        Some(f) if f < Decimal::ZERO => {
            assessed(dec!(10), max, format!("Negative free cash flow {f}"))
        }
        _ => assessed(Decimal::ZERO, max, "Operating cash flow non-negative".into()),
    }
}

fn solvency_bucket(equity_ratio: Option<Decimal>) -> BucketScore {
    let max = dec!(10);
    let Some(e) = equity_ratio else {
        return not_assessed(
            Decimal::ZERO,
            max,
            "Total equity or total assets missing; solvency not assessed",
        );
    };
    let points = match e {
        e if e < dec!(10) => dec!(10),
        e if e < dec!(20) => dec!(5),
        _ => Decimal::ZERO,
    };
    assessed(points, max, format!("Equity ratio {}%", e.round_dp(2)))
}
