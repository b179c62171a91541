use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The two statement families the fundamentals engine reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementFamily {
    Income,
    Balance,
}

impl fmt::Display for StatementFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementFamily::Income => write!(f, "income"),
            StatementFamily::Balance => write!(f, "balance"),
        }
    }
}

/// Line items of one statement for the most recent reporting period.
///
/// Keys are the provider's line-item names exactly as reported (e.g. `"Total Revenue"`).
/// Items reported as `null` or as anything that is not a number (e.g. `"Currency": "USD"`)
/// are dropped on deserialization, so a present key always holds a real figure and one bad
/// item never discards the rest of the statement. Zero is a legitimate figure and is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, RawFigure>", into = "BTreeMap<String, Decimal>")]
pub struct StatementSnapshot {
    items: BTreeMap<String, Decimal>,
}

impl StatementSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The figure reported under exactly `name`, if any.
    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.items.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Decimal) {
        self.items.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.items.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<K: Into<String>> FromIterator<(K, Decimal)> for StatementSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, Decimal)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// One reported value as found on the wire: a number (or numeric string), or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFigure {
    Figure(Decimal),
    Other(IgnoredAny),
}

impl From<BTreeMap<String, RawFigure>> for StatementSnapshot {
    fn from(raw: BTreeMap<String, RawFigure>) -> Self {
        Self {
            items: raw
                .into_iter()
                .filter_map(|(name, value)| match value {
                    RawFigure::Figure(v) => Some((name, v)),
                    RawFigure::Other(_) => {
                        tracing::debug!(item = %name, "Dropped line item: not a number.");
                        None
                    }
                })
                .collect(),
        }
    }
}

impl From<StatementSnapshot> for BTreeMap<String, Decimal> {
    fn from(snapshot: StatementSnapshot) -> Self {
        snapshot.items
    }
}

/// The latest income statement and balance sheet for one instrument.
///
/// Either family may be absent when the provider had nothing to report. An absent family
/// means "no data" and is never read as a statement full of zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<StatementSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<StatementSnapshot>,
}

impl FinancialStatements {
    pub fn new(income: Option<StatementSnapshot>, balance: Option<StatementSnapshot>) -> Self {
        Self { income, balance }
    }

    pub fn family(&self, family: StatementFamily) -> Option<&StatementSnapshot> {
        match family {
            StatementFamily::Income => self.income.as_ref(),
            StatementFamily::Balance => self.balance.as_ref(),
        }
    }

    /// True when neither family is present.
    pub fn is_empty(&self) -> bool {
        self.income.is_none() && self.balance.is_none()
    }
}
