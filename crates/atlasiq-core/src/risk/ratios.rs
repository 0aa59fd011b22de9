//! Financial ratio derivation.
//!
//! Each quotient is computed once in [`RatioSet`]. The health scorer reads
//! the raw values (any nonzero denominator); the display ratios keep only
//! those with a strictly positive denominator and round them to 2 dp.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::statements::{CashFlowInput, FinancialStatementInput};
use crate::types::{round2, Money, Multiple, Percent};

const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The seven display ratios stored alongside a risk score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatios {
    pub debt_to_ebitda: Option<Multiple>,
    pub ebitda_margin: Option<Percent>,
    pub roa: Option<Percent>,
    pub roe: Option<Percent>,
    pub current_ratio: Option<Multiple>,
    pub quick_ratio: Option<Multiple>,
    pub free_cashflow_yield: Option<Percent>,
}

impl FinancialRatios {
    /// Names of the ratios that could not be derived from the inputs.
    pub fn omitted(&self) -> Vec<&'static str> {
        [
            ("debt_to_ebitda", self.debt_to_ebitda),
            ("ebitda_margin", self.ebitda_margin),
            ("roa", self.roa),
            ("roe", self.roe),
            ("current_ratio", self.current_ratio),
            ("quick_ratio", self.quick_ratio),
            ("free_cashflow_yield", self.free_cashflow_yield),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A quotient together with the sign of its denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Quotient {
    pub value: Decimal,
    pub denominator_positive: bool,
}

impl Quotient {
    /// `None` when an input is absent, the denominator is zero or the
    /// quotient overflows.
    fn of(numerator: Option<Money>, denominator: Option<Money>) -> Option<Self> {
        let (n, d) = (numerator?, denominator?);
        if d.is_zero() {
            return None;
        }
        Some(Self {
            value: n.checked_div(d)?,
            denominator_positive: d > Decimal::ZERO,
        })
    }

    fn percent(self) -> Option<Self> {
        Some(Self {
            value: self.value.checked_mul(HUNDRED)?,
            ..self
        })
    }

    /// Display form: positive denominator only, rounded to 2 dp.
    fn display(this: Option<Self>) -> Option<Decimal> {
        this.filter(|q| q.denominator_positive)
            .map(|q| round2(q.value))
    }
}

/// Every quotient the engine needs, computed once per statement.
#[derive(Debug, Clone, Default)]
pub(crate) struct RatioSet {
    /// net_income / revenue × 100
    pub net_margin: Option<Quotient>,
    /// long_term_debt / ebitda
    pub debt_to_ebitda: Option<Quotient>,
    /// current_assets / current_liabilities
    pub current_ratio: Option<Quotient>,
    /// total_equity / total_assets × 100
    pub equity_ratio: Option<Quotient>,
    pub ebitda_margin: Option<Quotient>,
    pub roa: Option<Quotient>,
    pub roe: Option<Quotient>,
    pub quick_ratio: Option<Quotient>,
    pub free_cashflow_yield: Option<Quotient>,
}

impl RatioSet {
    pub(crate) fn derive(fs: &FinancialStatementInput, cf: Option<&CashFlowInput>) -> Self {
        // Absent inventory counts as zero for the quick ratio.
        let quick_assets = fs
            .current_assets
            .and_then(|ca| ca.checked_sub(fs.inventory.unwrap_or(Decimal::ZERO)));
        let free_cashflow = cf.and_then(|c| c.free_cashflow);

        Self {
            net_margin: Quotient::of(fs.net_income, fs.revenue).and_then(Quotient::percent),
            debt_to_ebitda: Quotient::of(fs.long_term_debt, fs.ebitda),
            current_ratio: Quotient::of(fs.current_assets, fs.current_liabilities),
            equity_ratio: Quotient::of(fs.total_equity, fs.total_assets)
                .and_then(Quotient::percent),
            ebitda_margin: Quotient::of(fs.ebitda, fs.revenue).and_then(Quotient::percent),
            roa: Quotient::of(fs.net_income, fs.total_assets).and_then(Quotient::percent),
            roe: Quotient::of(fs.net_income, fs.total_equity).and_then(Quotient::percent),
            quick_ratio: Quotient::of(quick_assets, fs.current_liabilities),
            free_cashflow_yield: Quotient::of(free_cashflow, fs.total_assets)
                .and_then(Quotient::percent),
        }
    }

    pub(crate) fn display(&self) -> FinancialRatios {
        FinancialRatios {
            debt_to_ebitda: Quotient::display(self.debt_to_ebitda),
            ebitda_margin: Quotient::display(self.ebitda_margin),
            roa: Quotient::display(self.roa),
            roe: Quotient::display(self.roe),
            current_ratio: Quotient::display(self.current_ratio),
            quick_ratio: Quotient::display(self.quick_ratio),
            free_cashflow_yield: Quotient::display(self.free_cashflow_yield),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the seven display ratios for one fiscal year.
///
/// A ratio is `None` whenever an input is absent, its denominator is not
/// strictly positive or the quotient exceeds the decimal range. No ratio is
/// ever synthesised from a default.
pub fn calculate_financial_ratios(
    fs: &FinancialStatementInput,
    cf: Option<&CashFlowInput>,
) -> FinancialRatios {
    RatioSet::derive(fs, cf).display()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_statement() -> FinancialStatementInput {
        FinancialStatementInput {
            revenue: Some(dec!(2_000)),
            ebitda: Some(dec!(300)),
            net_income: Some(dec!(120)),
            total_assets: Some(dec!(3_000)),
            current_assets: Some(dec!(900)),
            inventory: Some(dec!(200)),
            current_liabilities: Some(dec!(600)),
            long_term_debt: Some(dec!(750)),
            total_equity: Some(dec!(1_100)),
            ..FinancialStatementInput::for_year(2023)
        }
    }

    #[test]
    fn test_full_ratio_set() {
        let cf = CashFlowInput {
            fiscal_year: 2023,
            free_cashflow: Some(dec!(90)),
            ..Default::default()
        };
        let r = calculate_financial_ratios(&sample_statement(), Some(&cf));

        assert_eq!(
            r,
            FinancialRatios {
                // 750 / 300
                debt_to_ebitda: Some(dec!(2.50)),
                // 300 / 2000 × 100
                ebitda_margin: Some(dec!(15.00)),
                // 120 / 3000 × 100
                roa: Some(dec!(4.00)),
                // 120 / 1100 × 100 = 10.909...
                roe: Some(dec!(10.91)),
                // 900 / 600
                current_ratio: Some(dec!(1.50)),
                // (900 - 200) / 600 = 1.1666...
                quick_ratio: Some(dec!(1.17)),
                // 90 / 3000 × 100
                free_cashflow_yield: Some(dec!(3.00)),
            }
        );
        assert!(r.omitted().is_empty());
    }

    #[test]
    fn test_zero_current_liabilities_omits_liquidity_ratios() {
        let mut fs = sample_statement();
        fs.current_liabilities = Some(Decimal::ZERO);
        let r = calculate_financial_ratios(&fs, None);
        assert_eq!(r.current_ratio, None);
        assert_eq!(r.quick_ratio, None);

        fs.current_liabilities = None;
        let r = calculate_financial_ratios(&fs, None);
        assert_eq!(r.current_ratio, None);
        assert_eq!(r.quick_ratio, None);
    }

    #[test]
    fn test_negative_denominators_are_not_displayed() {
        let mut fs = sample_statement();
        fs.ebitda = Some(dec!(-50));
        fs.total_equity = Some(dec!(-10));
        let r = calculate_financial_ratios(&fs, None);
        assert_eq!(r.debt_to_ebitda, None);
        assert_eq!(r.roe, None);
        // Negative EBITDA is still a valid numerator for the margin.
        assert_eq!(r.ebitda_margin, Some(dec!(-2.50)));
    }

    #[test]
    fn test_quick_ratio_absent_inventory_counts_as_zero() {
        let mut fs = sample_statement();
        fs.inventory = None;
        let absent = calculate_financial_ratios(&fs, None).quick_ratio;
        fs.inventory = Some(Decimal::ZERO);
        let zero = calculate_financial_ratios(&fs, None).quick_ratio;
        assert_eq!(absent, Some(dec!(1.50)));
        assert_eq!(absent, zero);
    }

    #[test]
    fn test_free_cashflow_yield_requires_cashflow_record() {
        let r = calculate_financial_ratios(&sample_statement(), None);
        assert_eq!(r.free_cashflow_yield, None);
        assert_eq!(r.omitted(), vec!["free_cashflow_yield"]);

        let cf = CashFlowInput::default();
        let r = calculate_financial_ratios(&sample_statement(), Some(&cf));
        assert_eq!(r.free_cashflow_yield, None);
    }

    #[test]
    fn test_zero_numerator_is_a_real_value() {
        let mut fs = sample_statement();
        fs.net_income = Some(Decimal::ZERO);
        let r = calculate_financial_ratios(&fs, None);
        assert_eq!(r.roa, Some(Decimal::ZERO));
        assert_eq!(r.roe, Some(Decimal::ZERO));
    }

    #[test]
    fn test_raw_quotients_keep_negative_denominators() {
        let mut fs = sample_statement();
        fs.ebitda = Some(dec!(-100));
        let set = RatioSet::derive(&fs, None);
        let q = set.debt_to_ebitda.unwrap();
        assert_eq!(q.value, dec!(-7.5));
        assert!(!q.denominator_positive);
    }

    #[test]
    fn test_overflowing_quotients_are_omitted() {
        let fs = FinancialStatementInput {
            // 1e20 / 1e-10 exceeds the decimal range
            revenue: Some(Decimal::new(1, 10)),
            net_income: Some(dec!(100_000_000_000_000_000_000)),
            ebitda: Some(dec!(5)),
            // 1e27 fits, but not once scaled to a percentage
            total_assets: Some(Decimal::ONE),
            total_equity: Some(dec!(1_000_000_000_000_000_000_000_000_000)),
            // MAX - (-1) overflows the quick assets
            current_assets: Some(Decimal::MAX),
            inventory: Some(dec!(-1)),
            current_liabilities: Some(dec!(2)),
            ..FinancialStatementInput::for_year(2023)
        };
        let set = RatioSet::derive(&fs, None);
        assert_eq!(set.net_margin, None);
        assert_eq!(set.equity_ratio, None);
        assert_eq!(set.quick_ratio, None);
        // 1e20 / 1 × 100 still fits
        assert_eq!(set.roa.map(|q| q.value), Some(dec!(10_000_000_000_000_000_000_000)));
        // 5 / 1e-10 × 100 = 5e12
        assert_eq!(set.ebitda_margin.map(|q| q.value), Some(dec!(5_000_000_000_000)));
        assert!(set.current_ratio.is_some());

        assert!(set.display().omitted().contains(&"quick_ratio"));
    }
}
