use core_types::{FinancialStatements, StatementFamily, StatementSnapshot};
use rust_decimal::Decimal;

/// A logical statement figure the ratio engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineItem {
    Revenue,
    GrossProfit,
    OperatingIncome,
    NetIncome,
    TotalAssets,
    TotalEquity,
    CurrentAssets,
    CurrentLiabilities,
    TotalDebt,
    ShortTermDebt,
    LongTermDebt,
}

impl LineItem {
    /// The statement the figure is reported on.
    pub const fn family(self) -> StatementFamily {
        match self {
            LineItem::Revenue
            | LineItem::GrossProfit
            | LineItem::OperatingIncome
            | LineItem::NetIncome => StatementFamily::Income,
            LineItem::TotalAssets
            | LineItem::TotalEquity
            | LineItem::CurrentAssets
            | LineItem::CurrentLiabilities
            | LineItem::TotalDebt
            | LineItem::ShortTermDebt
            | LineItem::LongTermDebt => StatementFamily::Balance,
        }
    }

    /// Keys the figure may be reported under, canonical spelling first.
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            LineItem::Revenue => &["Total Revenue", "TotalRevenue", "Revenue"],
            LineItem::GrossProfit => &["Gross Profit", "GrossProfit"],
            LineItem::OperatingIncome => &["Operating Income", "OperatingIncome"],
            LineItem::NetIncome => &["Net Income", "NetIncome"],
            LineItem::TotalAssets => &["Total Assets", "TotalAssets"],
            LineItem::TotalEquity => &[
                "Total Stockholder Equity",
                "Total Stockholders Equity",
                "TotalEquity",
                "StockholdersEquity",
                "Stockholders Equity",
            ],
            LineItem::CurrentAssets => &["Total Current Assets", "TotalCurrentAssets"],
            LineItem::CurrentLiabilities => {
                &["Total Current Liabilities", "TotalCurrentLiabilities"]
            }
            LineItem::TotalDebt => &["Total Debt", "TotalDebt"],
            LineItem::ShortTermDebt => &["Short Long Term Debt", "ShortLongTermDebt", "Current Debt"],
            LineItem::LongTermDebt => &["Long Term Debt", "LongTermDebt"],
        }
    }
}

/// The value of the first key in `keys` that the snapshot reports.
///
/// A reported zero is a value and stops the search; only absent keys fall through.
pub fn first_defined(snapshot: &StatementSnapshot, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|key| snapshot.get(key))
}

/// Resolves a line item against its statement family, `None` when the family is absent
/// or none of the candidate keys is reported.
pub fn resolve(statements: &FinancialStatements, item: LineItem) -> Option<Decimal> {
    let snapshot = statements.family(item.family())?;
    first_defined(snapshot, item.candidates())
}

/// Total debt, falling back to short-term plus long-term debt.
///
/// In the fallback a missing component counts as zero, but when both components are
/// missing the total is `None`: an unreported debt figure is not the same as no debt.
pub fn resolve_total_debt(statements: &FinancialStatements) -> Option<Decimal> {
    if let Some(total) = resolve(statements, LineItem::TotalDebt) {
        return Some(total);
    }

    match (
        resolve(statements, LineItem::ShortTermDebt),
        resolve(statements, LineItem::LongTermDebt),
    ) {
        (None, None) => None,
        (short, long) => short
            .unwrap_or(Decimal::ZERO)
            .checked_add(long.unwrap_or(Decimal::ZERO)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balance(items: &[(&str, Decimal)]) -> FinancialStatements {
        FinancialStatements::new(None, Some(items.iter().copied().collect()))
    }

    #[test]
    fn canonical_key_wins_over_aliases() {
        let income: StatementSnapshot = [("TotalRevenue", dec!(1)), ("Total Revenue", dec!(2))]
            .into_iter()
            .collect();
        let statements = FinancialStatements::new(Some(income), None);
        assert_eq!(resolve(&statements, LineItem::Revenue), Some(dec!(2)));
    }

    #[test]
    fn alias_is_used_when_canonical_key_is_absent() {
        let statements = balance(&[("StockholdersEquity", dec!(250))]);
        assert_eq!(resolve(&statements, LineItem::TotalEquity), Some(dec!(250)));
    }

    #[test]
    fn zero_is_a_defined_value() {
        let income: StatementSnapshot = [("Revenue", dec!(10)), ("Total Revenue", dec!(0))]
            .into_iter()
            .collect();
        let statements = FinancialStatements::new(Some(income), None);
        assert_eq!(resolve(&statements, LineItem::Revenue), Some(dec!(0)));
    }

    #[test]
    fn absent_family_resolves_to_none() {
        let statements = balance(&[("Total Assets", dec!(1))]);
        assert_eq!(resolve(&statements, LineItem::NetIncome), None);
    }

    #[test]
    fn total_debt_prefers_direct_figure() {
        let statements = balance(&[
            ("Total Debt", dec!(100)),
            ("Long Term Debt", dec!(70)),
        ]);
        assert_eq!(resolve_total_debt(&statements), Some(dec!(100)));
    }

    #[test]
    fn total_debt_composes_components() {
        let both = balance(&[("Short Long Term Debt", dec!(30)), ("Long Term Debt", dec!(70))]);
        assert_eq!(resolve_total_debt(&both), Some(dec!(100)));

        let long_only = balance(&[("Long Term Debt", dec!(70))]);
        assert_eq!(resolve_total_debt(&long_only), Some(dec!(70)));

        let zero_short = balance(&[("Current Debt", dec!(0))]);
        assert_eq!(resolve_total_debt(&zero_short), Some(dec!(0)));
    }

    #[test]
    fn total_debt_without_any_component_is_undefined() {
        let statements = balance(&[("Total Assets", dec!(500))]);
        assert_eq!(resolve_total_debt(&statements), None);
        assert_eq!(resolve_total_debt(&FinancialStatements::default()), None);
    }

    #[test]
    fn every_item_has_a_canonical_key() {
        let items = [
            LineItem::Revenue,
            LineItem::GrossProfit,
            LineItem::OperatingIncome,
            LineItem::NetIncome,
            LineItem::TotalAssets,
            LineItem::TotalEquity,
            LineItem::CurrentAssets,
            LineItem::CurrentLiabilities,
            LineItem::TotalDebt,
            LineItem::ShortTermDebt,
            LineItem::LongTermDebt,
        ];
        for item in items {
            assert!(!item.candidates().is_empty(), "{item:?}");
        }
    }
}
