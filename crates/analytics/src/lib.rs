//! # Equilens Analytics Engine
//!
//! This crate turns price history into risk/return metrics: periodic returns, annualized
//! volatility, Sharpe ratio, maximum drawdown and beta against a benchmark.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of data providers,
//!   files or terminals. It depends only on `core-types` (Layer 0).
//! - **Undefined, not zero:** Every metric is an `Option<f64>`. Missing data, fewer than two
//!   observations or a zero denominator yield `None` for the affected symbol only. No
//!   function in this crate fails because of the data it is given.
//!
//! ## Public API
//!
//! - `compute_returns`: price table to return table.
//! - `volatility`, `sharpe_ratio`, `max_drawdown`, `beta_vs_benchmark`: the risk operations.
//! - `AnalyticsEngine`: runs all of the above for a universe and produces a `RiskReport`.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod returns;
pub mod risk;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, RiskParams};
pub use error::AnalyticsError;
pub use report::{RiskMetrics, RiskReport};
pub use returns::{compute_returns, period_returns};
pub use risk::{
    SymbolMetric, TRADING_DAYS, beta, beta_vs_benchmark, max_drawdown, max_drawdowns,
    sharpe_ratio, volatility,
};
