use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Risk/return metrics for one instrument.
///
/// Every field is `None` when the underlying data was insufficient or degenerate. `None`
/// is never a stand-in for zero: a flat price series has a volatility of `Some(0.0)` and a
/// drawdown of `Some(0.0)`, but an undefined Sharpe ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Annualized sample standard deviation of returns.
    pub volatility: Option<f64>,
    /// Annualized excess return over annualized volatility.
    pub sharpe_ratio: Option<f64>,
    /// Worst peak-to-trough decline as a fraction (`<= 0`).
    pub max_drawdown: Option<f64>,
    /// Sensitivity to the benchmark's returns. Always `None` for the benchmark itself.
    pub beta: Option<f64>,
}

/// The output of [`AnalyticsEngine::calculate`](crate::AnalyticsEngine::calculate).
///
/// Holds one [`RiskMetrics`] entry for every symbol of the priced universe, keyed and
/// ordered by symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// The symbol betas were measured against, when one was requested.
    pub benchmark: Option<String>,
    pub metrics: BTreeMap<String, RiskMetrics>,
}

impl RiskReport {
    pub fn new(benchmark: Option<String>) -> Self {
        Self {
            benchmark,
            metrics: BTreeMap::new(),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&RiskMetrics> {
        self.metrics.get(symbol)
    }

    /// Metrics for every symbol other than the benchmark.
    pub fn instruments(&self) -> impl Iterator<Item = (&str, &RiskMetrics)> {
        self.metrics
            .iter()
            .filter(move |(symbol, _)| self.benchmark.as_deref() != Some(symbol.as_str()))
            .map(|(symbol, metrics)| (symbol.as_str(), metrics))
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
