use crate::returns::compute_returns;
use crate::stats::{mean, sample_covariance, sample_std, sample_variance};
use core_types::PriceTable;
use std::collections::BTreeMap;

/// Conventional number of trading days in a year.
pub const TRADING_DAYS: u32 = 252;

/// One scalar per symbol. `None` means the metric is undefined for that symbol.
pub type SymbolMetric = BTreeMap<String, Option<f64>>;

fn observed(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

/// Applies `metric` to the observed returns of every symbol.
fn per_symbol_returns<F>(prices: &PriceTable, metric: F) -> SymbolMetric
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let returns = compute_returns(prices);
    if returns.is_empty() {
        return SymbolMetric::new();
    }
    returns
        .columns()
        .map(|(symbol, values)| (symbol.to_string(), metric(&observed(values))))
        .collect()
}

/// Annualized volatility of every symbol's returns.
///
/// Sample standard deviation of the observed returns scaled by `sqrt(trading_periods)`.
/// A symbol with fewer than two return observations is `None`. When the price table
/// yields no returns at all, the result is empty.
pub fn volatility(prices: &PriceTable, trading_periods: u32) -> SymbolMetric {
    per_symbol_returns(prices, |returns| annualized_volatility(returns, trading_periods))
}

/// Annualized sample standard deviation of a return series.
pub fn annualized_volatility(returns: &[f64], trading_periods: u32) -> Option<f64> {
    sample_std(returns).map(|std| std * f64::from(trading_periods).sqrt())
}

/// Annualized Sharpe ratio of every symbol.
///
/// `risk_free_annual` is a yearly rate (0.02 for 2%) and is spread evenly over
/// `trading_periods`. Symbols whose volatility is zero or undefined are `None`.
pub fn sharpe_ratio(
    prices: &PriceTable,
    risk_free_annual: f64,
    trading_periods: u32,
) -> SymbolMetric {
    per_symbol_returns(prices, |returns| {
        annualized_sharpe(returns, risk_free_annual, trading_periods)
    })
}

/// Annualized mean excess return divided by annualized volatility of the raw returns.
pub fn annualized_sharpe(
    returns: &[f64],
    risk_free_annual: f64,
    trading_periods: u32,
) -> Option<f64> {
    let periods = f64::from(trading_periods);
    let per_period_rf = risk_free_annual / periods;

    let excess: Vec<f64> = returns.iter().map(|r| r - per_period_rf).collect();
    let annual_excess = mean(&excess)? * periods;

    let sigma = annualized_volatility(returns, trading_periods)?;
    if sigma == 0.0 {
        return None;
    }

    // Any residual infinity or NaN is reported as undefined, never returned.
    let ratio = annual_excess / sigma;
    ratio.is_finite().then_some(ratio)
}

/// Most negative peak-to-trough decline of a price series, as a fraction (`<= 0`).
///
/// Missing prices are skipped. An empty series is `None`; a series that never falls below
/// its running peak yields exactly `0.0`.
pub fn max_drawdown(prices: &[Option<f64>]) -> Option<f64> {
    let mut running_max = f64::NEG_INFINITY;
    let mut worst: Option<f64> = None;

    for price in prices.iter().flatten() {
        running_max = running_max.max(*price);
        let drawdown = price / running_max - 1.0;
        if drawdown.is_finite() {
            worst = Some(worst.map_or(drawdown, |w| w.min(drawdown)));
        }
    }

    worst
}

/// [`max_drawdown`] applied to every column of a price table.
pub fn max_drawdowns(prices: &PriceTable) -> SymbolMetric {
    prices
        .columns()
        .map(|(symbol, values)| (symbol.to_string(), max_drawdown(values)))
        .collect()
}

/// Beta of every non-benchmark symbol against `benchmark`.
///
/// Returns are paired on the dates where both the symbol and the benchmark have a value.
/// The result is empty when there are no returns or the benchmark is not in the table.
pub fn beta_vs_benchmark(prices: &PriceTable, benchmark: &str) -> SymbolMetric {
    let returns = compute_returns(prices);
    if returns.is_empty() {
        return SymbolMetric::new();
    }
    let Some(bench) = returns.column(benchmark) else {
        return SymbolMetric::new();
    };

    returns
        .columns()
        .filter(|(symbol, _)| *symbol != benchmark)
        .map(|(symbol, values)| (symbol.to_string(), beta(values, bench)))
        .collect()
}

/// Sample covariance with the benchmark over the benchmark's sample variance.
///
/// Both slices are aligned on the same dates. Pairs with a missing side are dropped first;
/// fewer than two remaining pairs, or a benchmark without variance, give `None`.
pub fn beta(asset: &[Option<f64>], benchmark: &[Option<f64>]) -> Option<f64> {
    let (ys, xs): (Vec<f64>, Vec<f64>) = asset
        .iter()
        .zip(benchmark)
        .filter_map(|(y, x)| Some(((*y)?, (*x)?)))
        .unzip();

    if xs.len() < 2 {
        return None;
    }

    let variance = sample_variance(&xs)?;
    if variance == 0.0 {
        return None;
    }
    let covariance = sample_covariance(&ys, &xs)?;

    let beta = covariance / variance;
    beta.is_finite().then_some(beta)
}
