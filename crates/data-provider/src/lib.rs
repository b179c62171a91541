//! # Equilens Data Provider
//!
//! The seam between the analytics and wherever market data comes from.
//!
//! ## Architectural Principles
//!
//! - **Failures are values:** a fetch never returns an error to the caller. It returns an
//!   [`Acquisition`], and an unavailable acquisition degrades to the empty value the
//!   analytics already handle (an empty table, a snapshot with no statement families).
//! - **Swappable sources:** everything downstream depends only on [`MarketDataProvider`].
//!
//! ## Public API
//!
//! - `MarketDataProvider`: the acquisition trait.
//! - `JsonFileProvider`, `InMemoryProvider`: the bundled implementations.
//! - `load_price_table`, `load_statements`: multi-symbol helpers.

use chrono::NaiveDate;
use core_types::{FinancialStatements, PriceTable};
use std::collections::BTreeMap;

pub mod acquisition;
pub mod error;
pub mod json_file;
pub mod memory;

// --- Public API ---
pub use acquisition::Acquisition;
pub use error::ProviderError;
pub use json_file::JsonFileProvider;
pub use memory::InMemoryProvider;

/// A source of adjusted price history and latest financial statements.
pub trait MarketDataProvider: Send + Sync {
    /// Adjusted closes of `symbol` within `[start, end]` (open bounds are unbounded).
    fn fetch_price_history(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Acquisition<PriceTable>;

    /// The most recent income statement and balance sheet of `symbol`.
    fn fetch_statements(&self, symbol: &str) -> Acquisition<FinancialStatements>;
}

/// One symbol's column of `prices`, restricted to the window, without empty rows.
pub(crate) fn history_for(
    prices: &PriceTable,
    symbol: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<PriceTable, error::ProviderError> {
    if !prices.contains(symbol) {
        return Err(ProviderError::UnknownSymbol(symbol.to_string()));
    }
    Ok(prices.select(&[symbol]).between(start, end).drop_empty_rows())
}

/// Fetches every symbol and joins the histories on their dates.
///
/// Symbols that could not be fetched are left out. Dates on which no symbol has a price
/// are dropped.
pub fn load_price_table<P, S>(
    provider: &P,
    symbols: &[S],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> PriceTable
where
    P: MarketDataProvider + ?Sized,
    S: AsRef<str>,
{
    let merged = symbols.iter().fold(PriceTable::new(), |table, symbol| {
        let history = provider
            .fetch_price_history(symbol.as_ref(), start, end)
            .into_inner_or_default();
        table.merge(&history)
    });
    tracing::debug!(
        requested = symbols.len(),
        loaded = merged.symbols().len(),
        rows = merged.len(),
        "Price table loaded."
    );
    merged.drop_empty_rows()
}

/// Fetches the statements of every symbol. A failed fetch maps to no statement families.
pub fn load_statements<P, S>(provider: &P, symbols: &[S]) -> BTreeMap<String, FinancialStatements>
where
    P: MarketDataProvider + ?Sized,
    S: AsRef<str>,
{
    symbols
        .iter()
        .map(|symbol| {
            let symbol = symbol.as_ref();
            let statements = provider.fetch_statements(symbol).into_inner_or_default();
            (symbol.to_string(), statements)
        })
        .collect()
}
