use crate::division::safe_divide;
use crate::error::FundamentalsError;
use crate::line_items::{LineItem, resolve, resolve_total_debt};
use core_types::FinancialStatements;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of ratios every [`FundamentalRatios`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ratio {
    #[serde(rename = "Gross Margin")]
    GrossMargin,
    #[serde(rename = "Operating Margin")]
    OperatingMargin,
    #[serde(rename = "Net Margin")]
    NetMargin,
    #[serde(rename = "ROA")]
    ReturnOnAssets,
    #[serde(rename = "ROE")]
    ReturnOnEquity,
    #[serde(rename = "Current Ratio")]
    CurrentRatio,
    #[serde(rename = "Debt to Equity")]
    DebtToEquity,
}

impl Ratio {
    pub const ALL: [Ratio; 7] = [
        Ratio::GrossMargin,
        Ratio::OperatingMargin,
        Ratio::NetMargin,
        Ratio::ReturnOnAssets,
        Ratio::ReturnOnEquity,
        Ratio::CurrentRatio,
        Ratio::DebtToEquity,
    ];

    /// Display name, also used as the serialized key.
    pub const fn name(self) -> &'static str {
        match self {
            Ratio::GrossMargin => "Gross Margin",
            Ratio::OperatingMargin => "Operating Margin",
            Ratio::NetMargin => "Net Margin",
            Ratio::ReturnOnAssets => "ROA",
            Ratio::ReturnOnEquity => "ROE",
            Ratio::CurrentRatio => "Current Ratio",
            Ratio::DebtToEquity => "Debt to Equity",
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ratio {
    type Err = FundamentalsError;

    /// Accepts display names and their compact forms, ignoring case, spaces, `_` and `-`
    /// (`"Debt to Equity"`, `"debt_to_equity"` and `"DebtToEquity"` are all the same ratio).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact = |text: &str| -> String {
            text.chars()
                .filter(|c| !matches!(c, ' ' | '_' | '-'))
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = compact(s);

        Ratio::ALL
            .into_iter()
            .find(|ratio| compact(ratio.name()) == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Ratio::ALL.iter().map(|r| r.name()).collect();
                FundamentalsError::UnknownRatio(s.to_string(), known.join(", "))
            })
    }
}

/// Fundamental ratios for one instrument.
///
/// All seven keys are always present; each is `None` when its inputs were unavailable or
/// its denominator was zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRatios {
    #[serde(rename = "Gross Margin")]
    pub gross_margin: Option<f64>,
    #[serde(rename = "Operating Margin")]
    pub operating_margin: Option<f64>,
    #[serde(rename = "Net Margin")]
    pub net_margin: Option<f64>,
    #[serde(rename = "ROA")]
    pub return_on_assets: Option<f64>,
    #[serde(rename = "ROE")]
    pub return_on_equity: Option<f64>,
    #[serde(rename = "Current Ratio")]
    pub current_ratio: Option<f64>,
    #[serde(rename = "Debt to Equity")]
    pub debt_to_equity: Option<f64>,
}

impl FundamentalRatios {
    pub fn get(&self, ratio: Ratio) -> Option<f64> {
        match ratio {
            Ratio::GrossMargin => self.gross_margin,
            Ratio::OperatingMargin => self.operating_margin,
            Ratio::NetMargin => self.net_margin,
            Ratio::ReturnOnAssets => self.return_on_assets,
            Ratio::ReturnOnEquity => self.return_on_equity,
            Ratio::CurrentRatio => self.current_ratio,
            Ratio::DebtToEquity => self.debt_to_equity,
        }
    }

    /// Every ratio with its value, in [`Ratio::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Ratio, Option<f64>)> + '_ {
        Ratio::ALL.into_iter().map(move |ratio| (ratio, self.get(ratio)))
    }
}

/// Computes the fundamental ratios from the latest statements of one instrument.
///
/// Margins need the income statement; ROA, ROE, current ratio and debt to equity need the
/// balance sheet, and ROA/ROE additionally need net income from the income statement.
/// A missing family or line item leaves only the ratios depending on it undefined.
pub fn fundamental_ratios(statements: &FinancialStatements) -> FundamentalRatios {
    if statements.income.is_none() {
        tracing::debug!("No income statement; margins are undefined.");
    }
    if statements.balance.is_none() {
        tracing::debug!("No balance sheet; balance-sheet ratios are undefined.");
    }

    let figure = |item: LineItem| resolve(statements, item);

    let revenue = figure(LineItem::Revenue);
    let net_income = figure(LineItem::NetIncome);
    let total_equity = figure(LineItem::TotalEquity);

    FundamentalRatios {
        gross_margin: safe_divide(figure(LineItem::GrossProfit), revenue),
        operating_margin: safe_divide(figure(LineItem::OperatingIncome), revenue),
        net_margin: safe_divide(net_income, revenue),
        return_on_assets: safe_divide(net_income, figure(LineItem::TotalAssets)),
        return_on_equity: safe_divide(net_income, total_equity),
        current_ratio: safe_divide(
            figure(LineItem::CurrentAssets),
            figure(LineItem::CurrentLiabilities),
        ),
        debt_to_equity: safe_divide(resolve_total_debt(statements), total_equity),
    }
}
