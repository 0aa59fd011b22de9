//! Company financial statement records consumed by the scoring engine.
//!
//! Every line item is optional. `None` means the value is unknown; a
//! present zero is a real reported zero and is scored as such. Only
//! `fiscal_year` is required when deserializing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Money;

/// Parse an ISO 8601 date or date-time into its calendar date.
///
/// Accepts `2023-12-31`, `2023-12-31T00:00:00`, and RFC 3339 forms with a
/// `Z` or numeric offset. The date is taken as written, not shifted to UTC.
pub fn parse_period_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Unparseable period dates become `None` rather than failing the record.
fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.as_deref().and_then(parse_period_date))
}

/// One fiscal year of income statement and balance sheet data, in EUR.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatementInput {
    pub fiscal_year: i32,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub period_end_date: Option<NaiveDate>,

    // Income statement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_of_revenue: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_expenses: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebitda: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebit: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_expense: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_expense: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_income: Option<Money>,

    // Balance sheet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_assets: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_assets: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_and_equivalents: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts_receivable: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_liabilities: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_liabilities: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_term_debt: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_term_debt: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_equity: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retained_earnings: Option<Money>,
}

impl FinancialStatementInput {
    /// An empty statement for the given year: every line item unknown.
    pub fn for_year(fiscal_year: i32) -> Self {
        Self {
            fiscal_year,
            ..Self::default()
        }
    }

    /// Apply `f` to every present line item, keeping absent ones absent.
    /// `f` receives the field name with the amount; the first error wins.
    pub fn try_map_amounts<E>(
        &self,
        mut f: impl FnMut(&'static str, Money) -> Result<Money, E>,
    ) -> Result<Self, E> {
        let mut g = |name: &'static str, v: Option<Money>| v.map(|x| f(name, x)).transpose();
        Ok(Self {
            fiscal_year: self.fiscal_year,
            period_end_date: self.period_end_date,
            revenue: g("revenue", self.revenue)?,
            cost_of_revenue: g("cost_of_revenue", self.cost_of_revenue)?,
            gross_profit: g("gross_profit", self.gross_profit)?,
            operating_expenses: g("operating_expenses", self.operating_expenses)?,
            ebitda: g("ebitda", self.ebitda)?,
            ebit: g("ebit", self.ebit)?,
            interest_expense: g("interest_expense", self.interest_expense)?,
            tax_expense: g("tax_expense", self.tax_expense)?,
            net_income: g("net_income", self.net_income)?,
            total_assets: g("total_assets", self.total_assets)?,
            current_assets: g("current_assets", self.current_assets)?,
            cash_and_equivalents: g("cash_and_equivalents", self.cash_and_equivalents)?,
            accounts_receivable: g("accounts_receivable", self.accounts_receivable)?,
            inventory: g("inventory", self.inventory)?,
            total_liabilities: g("total_liabilities", self.total_liabilities)?,
            current_liabilities: g("current_liabilities", self.current_liabilities)?,
            long_term_debt: g("long_term_debt", self.long_term_debt)?,
            short_term_debt: g("short_term_debt", self.short_term_debt)?,
            total_equity: g("total_equity", self.total_equity)?,
            retained_earnings: g("retained_earnings", self.retained_earnings)?,
        })
    }
}

/// One fiscal year of cash flow statement data, in EUR.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowInput {
    pub fiscal_year: i32,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub period_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_cashflow: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capex: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investing_cashflow: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financing_cashflow: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_cashflow: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividends_paid: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_issued: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_repaid: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity_issued: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_change_in_cash: Option<Money>,
}

impl CashFlowInput {
    /// Apply `f` to every present line item, keeping absent ones absent.
    /// `f` receives the field name with the amount; the first error wins.
    pub fn try_map_amounts<E>(
        &self,
        mut f: impl FnMut(&'static str, Money) -> Result<Money, E>,
    ) -> Result<Self, E> {
        let mut g = |name: &'static str, v: Option<Money>| v.map(|x| f(name, x)).transpose();
        Ok(Self {
            fiscal_year: self.fiscal_year,
            period_end_date: self.period_end_date,
            operating_cashflow: g("operating_cashflow", self.operating_cashflow)?,
            capex: g("capex", self.capex)?,
            investing_cashflow: g("investing_cashflow", self.investing_cashflow)?,
            financing_cashflow: g("financing_cashflow", self.financing_cashflow)?,
            free_cashflow: g("free_cashflow", self.free_cashflow)?,
            dividends_paid: g("dividends_paid", self.dividends_paid)?,
            debt_issued: g("debt_issued", self.debt_issued)?,
            debt_repaid: g("debt_repaid", self.debt_repaid)?,
            equity_issued: g("equity_issued", self.equity_issued)?,
            net_change_in_cash: g("net_change_in_cash", self.net_change_in_cash)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_statement_deserializes() {
        let fs: FinancialStatementInput =
            serde_json::from_str(r#"{"fiscal_year": 2023, "revenue": 1000, "net_income": "-12.5"}"#)
                .unwrap();
        assert_eq!(fs.fiscal_year, 2023);
        assert_eq!(fs.revenue, Some(dec!(1000)));
        assert_eq!(fs.net_income, Some(dec!(-12.5)));
        assert_eq!(fs.ebitda, None);
    }

    #[test]
    fn test_map_amounts_keeps_absent_fields_absent() {
        let fs = FinancialStatementInput {
            revenue: Some(dec!(100)),
            inventory: Some(Decimal::ZERO),
            ..FinancialStatementInput::for_year(2022)
        };
        let doubled = fs
            .try_map_amounts(|_, v| Ok::<_, ()>(v * dec!(2)))
            .unwrap();
        assert_eq!(doubled.revenue, Some(dec!(200)));
        assert_eq!(doubled.inventory, Some(Decimal::ZERO));
        assert_eq!(doubled.ebitda, None);
        assert_eq!(doubled.fiscal_year, 2022);
    }

    #[test]
    fn test_absent_fields_are_skipped_when_serialized() {
        let cf = CashFlowInput {
            fiscal_year: 2021,
            free_cashflow: Some(dec!(-5)),
            ..Default::default()
        };
        let json = serde_json::to_value(&cf).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("free_cashflow"));
        assert!(!obj.contains_key("capex"));
    }

    #[test]
    fn test_fiscal_year_is_required() {
        let err = serde_json::from_str::<CashFlowInput>(r#"{"free_cashflow": 10}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_period_dates_normalize_to_calendar_date() {
        let d = NaiveDate::from_ymd_opt(2023, 12, 31);
        assert_eq!(parse_period_date("2023-12-31"), d);
        assert_eq!(parse_period_date(" 2023-12-31T00:00:00 "), d);
        assert_eq!(parse_period_date("2023-12-31T23:30:00Z"), d);
        assert_eq!(parse_period_date("2023-12-31T08:00:00+02:00"), d);
        assert_eq!(parse_period_date("31/12/2023"), None);
        assert_eq!(parse_period_date(""), None);
    }

    #[test]
    fn test_unparseable_period_date_is_dropped() {
        let fs: FinancialStatementInput = serde_json::from_str(
            r#"{"fiscal_year": 2023, "period_end_date": "2023-12-31T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(fs.period_end_date, NaiveDate::from_ymd_opt(2023, 12, 31));
        let json = serde_json::to_value(&fs).unwrap();
        assert_eq!(json["period_end_date"], "2023-12-31");

        let cf: CashFlowInput =
            serde_json::from_str(r#"{"fiscal_year": 2023, "period_end_date": "soon"}"#).unwrap();
        assert_eq!(cf.period_end_date, None);
    }
}
