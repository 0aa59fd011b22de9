//! Property-based tests for the risk scoring engine.

use atlasiq_core::risk::{
    calculate_financial_ratios, composite_score, financial_health_score, RiskCategory,
    RiskRequest, RiskScoringEngine, RiskThresholds, RiskWeights, NEUTRAL_SCORE,
};
use atlasiq_core::statements::{CashFlowInput, FinancialStatementInput};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Generators
// =============================================================================

/// Amounts in cents between -10bn and 10bn, including exact zero, plus
/// occasional extreme magnitudes near the edges of the decimal range.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        2 => Just(Decimal::ZERO),
        15 => (-1_000_000_000_000i64..1_000_000_000_000i64).prop_map(|c| Decimal::new(c, 2)),
        2 => (any::<i64>(), 0u32..=28).prop_map(|(m, scale)| Decimal::new(m, scale)),
        1 => prop_oneof![Just(Decimal::MAX), Just(Decimal::MIN)],
    ]
}

fn arb_opt_amount() -> impl Strategy<Value = Option<Decimal>> {
    proptest::option::of(arb_amount())
}

fn arb_statement() -> impl Strategy<Value = FinancialStatementInput> {
    (
        (arb_opt_amount(), arb_opt_amount(), arb_opt_amount()),
        (arb_opt_amount(), arb_opt_amount(), arb_opt_amount()),
        (arb_opt_amount(), arb_opt_amount(), arb_opt_amount()),
    )
        .prop_map(
            |(
                (revenue, net_income, ebitda),
                (long_term_debt, current_assets, current_liabilities),
                (inventory, total_equity, total_assets),
            )| FinancialStatementInput {
                revenue,
                net_income,
                ebitda,
                long_term_debt,
                current_assets,
                current_liabilities,
                inventory,
                total_equity,
                total_assets,
                ..FinancialStatementInput::for_year(2023)
            },
        )
}

fn arb_cashflow() -> impl Strategy<Value = Option<CashFlowInput>> {
    proptest::option::of((arb_opt_amount(), arb_opt_amount()).prop_map(|(ocf, fcf)| {
        CashFlowInput {
            fiscal_year: 2023,
            operating_cashflow: ocf,
            free_cashflow: fcf,
            ..Default::default()
        }
    }))
}

/// Scores on the 0-100 scale with two decimals.
fn arb_score() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|v| Decimal::new(v, 2))
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Financial health always lies within [0, 100].
    #[test]
    fn prop_health_score_in_range(fs in arb_statement(), cf in arb_cashflow()) {
        let h = financial_health_score(&fs, cf.as_ref());
        prop_assert!(h >= Decimal::ZERO && h <= dec!(100), "health {h}");
    }

    /// With both lookups silent the composite is 25 + health / 2.
    #[test]
    fn prop_neutral_composite_identity(health in arb_score()) {
        let overall = composite_score(None, None, health, &RiskWeights::default(), NEUTRAL_SCORE);
        let expected = (dec!(0.30) * dec!(50) + dec!(0.20) * dec!(50) + dec!(0.50) * health)
            .round_dp(2);
        prop_assert_eq!(overall, expected);
    }

    /// Ratio derivation never panics, and liquidity ratios only appear with
    /// positive current liabilities.
    #[test]
    fn prop_ratios_respect_denominators(fs in arb_statement(), cf in arb_cashflow()) {
        let r = calculate_financial_ratios(&fs, cf.as_ref());
        let cl_positive = fs.current_liabilities.is_some_and(|cl| cl > Decimal::ZERO);
        if !cl_positive {
            prop_assert!(r.current_ratio.is_none());
            prop_assert!(r.quick_ratio.is_none());
        }
        if !fs.ebitda.is_some_and(|e| e > Decimal::ZERO) {
            prop_assert!(r.debt_to_ebitda.is_none());
        }
        for v in [r.debt_to_ebitda, r.ebitda_margin, r.roa, r.roe, r.current_ratio, r.quick_ratio, r.free_cashflow_yield]
            .into_iter()
            .flatten()
        {
            prop_assert_eq!(v, v.round_dp(2));
        }
    }

    /// Categories are monotone in the score.
    #[test]
    fn prop_category_monotone(a in arb_score(), b in arb_score()) {
        let t = RiskThresholds::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(RiskCategory::from_score(lo, &t) <= RiskCategory::from_score(hi, &t));
    }

    /// Scoring is a pure function of its inputs and the injected date.
    #[test]
    fn prop_engine_idempotent(fs in arb_statement(), cf in arb_cashflow(), country in "[A-Z]{2}") {
        let engine = RiskScoringEngine::new();
        let req = RiskRequest {
            company_id: 1,
            country_code: country,
            sector_code: Some("C25".into()),
            fiscal_year: 2023,
            financial_statement: Some(fs),
            cashflow: cf,
        };
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let first = engine.calculate_risk(&req, date).unwrap();
        let second = engine.calculate_risk(&req, date).unwrap();
        prop_assert!(first.result.overall_risk_score >= Decimal::ZERO);
        prop_assert!(first.result.overall_risk_score <= dec!(100));
        prop_assert_eq!(first, second);
    }
}
