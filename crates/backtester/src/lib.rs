//! # Equilens Backtester
//!
//! Compounds period returns into cumulative growth curves and compares a buy-and-hold
//! position in one instrument against its benchmark.

use analytics::compute_returns;
use core_types::{PriceTable, ReturnTable};
use serde::{Deserialize, Serialize};

/// Compounded growth since the first return period, per column.
///
/// Each value is the running product of `(1 + r)` minus one. A missing return leaves the
/// running product untouched and is reported as missing for that row. An empty price table,
/// or one that yields no returns, gives an empty table.
pub fn cumulative_returns(prices: &PriceTable) -> ReturnTable {
    let returns = compute_returns(prices);
    if returns.is_empty() {
        return ReturnTable::new();
    }
    returns.map_columns(compound)
}

/// Running compounded growth of a single return column.
pub fn compound(returns: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut growth = 1.0;
    returns
        .iter()
        .map(|r| {
            r.map(|r| {
                growth *= 1.0 + r;
                growth - 1.0
            })
        })
        .collect()
}

/// The outcome of holding `ticker` and `benchmark` over the same price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyAndHold {
    pub ticker: String,
    pub benchmark: String,
    /// Cumulative growth curves of both legs.
    pub cumulative: ReturnTable,
    /// Last cumulative return of the ticker.
    pub ticker_return: Option<f64>,
    /// Last cumulative return of the benchmark.
    pub benchmark_return: Option<f64>,
    /// `ticker_return - benchmark_return`, when both are defined.
    pub excess_return: Option<f64>,
}

/// Buy-and-hold comparison of `ticker` against `benchmark`.
///
/// Only the two columns are considered, so rows where neither has a price do not count.
/// A leg missing from `prices` simply has no cumulative curve and no final return.
pub fn buy_and_hold(prices: &PriceTable, ticker: &str, benchmark: &str) -> BuyAndHold {
    let cumulative = cumulative_returns(&prices.select(&[ticker, benchmark]));

    let last = |symbol: &str| {
        cumulative
            .column(symbol)
            .and_then(|values| values.iter().rev().find_map(|v| *v))
    };
    let ticker_return = last(ticker);
    let benchmark_return = last(benchmark);

    let excess_return = match (ticker_return, benchmark_return) {
        (Some(t), Some(b)) => Some(t - b),
        _ => None,
    };

    tracing::debug!(
        ticker,
        benchmark,
        ?ticker_return,
        ?benchmark_return,
        "Buy-and-hold comparison complete."
    );

    BuyAndHold {
        ticker: ticker.to_string(),
        benchmark: benchmark.to_string(),
        cumulative,
        ticker_return,
        benchmark_return,
        excess_return,
    }
}
