use crate::error::AnalyticsError;
use crate::report::{RiskMetrics, RiskReport};
use crate::risk::{
    SymbolMetric, TRADING_DAYS, beta_vs_benchmark, max_drawdowns, sharpe_ratio, volatility,
};
use core_types::PriceTable;
use serde::{Deserialize, Serialize};

/// Annualization and risk-free settings shared by every metric of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskParams {
    /// Number of return periods in a year (252 for daily data).
    pub trading_periods: u32,
    /// Annual risk-free rate as a fraction (0.02 for 2%).
    pub risk_free_rate: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            trading_periods: TRADING_DAYS,
            risk_free_rate: 0.0,
        }
    }
}

/// A stateless calculator for deriving risk/return metrics from price history.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    params: RiskParams,
}

impl AnalyticsEngine {
    /// Creates a new `AnalyticsEngine`, rejecting parameters no metric could use.
    pub fn new(params: RiskParams) -> Result<Self, AnalyticsError> {
        if params.trading_periods == 0 {
            return Err(AnalyticsError::InvalidParameters(
                "trading_periods must be greater than 0".to_string(),
            ));
        }
        if !params.risk_free_rate.is_finite() {
            return Err(AnalyticsError::InvalidParameters(format!(
                "risk_free_rate must be a finite number, got {}",
                params.risk_free_rate
            )));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &RiskParams {
        &self.params
    }

    /// The main entry point for calculating risk metrics.
    ///
    /// # Arguments
    ///
    /// * `prices` - Adjusted closes for the whole universe, benchmark column included.
    /// * `benchmark` - The symbol betas are measured against, if any.
    ///
    /// # Returns
    ///
    /// A `RiskReport` with an entry for every symbol in `prices`. Symbols without enough
    /// data carry `None` metrics; they never prevent other symbols from being measured.
    pub fn calculate(&self, prices: &PriceTable, benchmark: Option<&str>) -> RiskReport {
        let mut report = RiskReport::new(benchmark.map(str::to_string));

        if prices.is_empty() {
            tracing::debug!("Price table is empty; no risk metrics to calculate.");
            return report;
        }

        let RiskParams {
            trading_periods,
            risk_free_rate,
        } = self.params;

        let vol = volatility(prices, trading_periods);
        let sharpe = sharpe_ratio(prices, risk_free_rate, trading_periods);
        let drawdown = max_drawdowns(prices);
        let betas = match benchmark {
            Some(symbol) if prices.contains(symbol) => beta_vs_benchmark(prices, symbol),
            Some(symbol) => {
                tracing::warn!(benchmark = %symbol, "Benchmark has no price data; betas are undefined.");
                SymbolMetric::new()
            }
            None => SymbolMetric::new(),
        };

        let lookup = |metric: &SymbolMetric, symbol: &str| metric.get(symbol).copied().flatten();

        for symbol in prices.symbols() {
            let metrics = RiskMetrics {
                volatility: lookup(&vol, symbol),
                sharpe_ratio: lookup(&sharpe, symbol),
                max_drawdown: lookup(&drawdown, symbol),
                beta: lookup(&betas, symbol),
            };

            let is_benchmark = benchmark == Some(symbol.as_str());
            log_undefined(symbol, &metrics, benchmark.is_some() && !is_benchmark);
            report.metrics.insert(symbol.clone(), metrics);
        }

        report
    }
}

fn log_undefined(symbol: &str, metrics: &RiskMetrics, expects_beta: bool) {
    let checks = [
        ("volatility", metrics.volatility.is_none()),
        ("sharpe_ratio", metrics.sharpe_ratio.is_none()),
        ("max_drawdown", metrics.max_drawdown.is_none()),
        ("beta", expects_beta && metrics.beta.is_none()),
    ];
    for (metric, undefined) in checks {
        if undefined {
            tracing::debug!(symbol, metric, "Metric undefined: insufficient or degenerate data.");
        }
    }
}
