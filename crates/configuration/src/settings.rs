use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisSettings,
    pub screener: ScreenerSettings,
    pub logging: LoggingSettings,
}

/// Parameters for a risk analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Instruments analyzed when none are given on the command line.
    pub tickers: Vec<String>,
    /// The symbol betas are measured against (e.g., "SPY").
    pub benchmark: String,
    /// Annual risk-free rate as a fraction. 0.02 corresponds to 2%.
    pub risk_free_rate: f64,
    /// Return periods per year used for annualization.
    pub trading_periods: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            benchmark: "SPY".to_string(),
            risk_free_rate: 0.0,
            trading_periods: 252,
            start_date: None,
            end_date: None,
        }
    }
}

/// Parameters for the fundamentals screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerSettings {
    /// Name of the ratio to rank by (e.g., "ROE", "Net Margin").
    pub metric: String,
    pub top: usize,
}

impl Default for ScreenerSettings {
    fn default() -> Self {
        Self {
            metric: "ROE".to_string(),
            top: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    /// Directory for the daily log file. `None` logs to the console only.
    pub directory: Option<PathBuf>,
    pub file_name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: Some(PathBuf::from("logs")),
            file_name: "equilens.log".to_string(),
        }
    }
}

impl Config {
    /// Rejects values no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if analysis.trading_periods == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.trading_periods must be greater than 0".to_string(),
            ));
        }
        if !analysis.risk_free_rate.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "analysis.risk_free_rate must be finite, got {}",
                analysis.risk_free_rate
            )));
        }
        if let (Some(start), Some(end)) = (analysis.start_date, analysis.end_date) {
            if start > end {
                return Err(ConfigError::ValidationError(format!(
                    "analysis.start_date {start} is after analysis.end_date {end}"
                )));
            }
        }
        if self.screener.top == 0 {
            return Err(ConfigError::ValidationError(
                "screener.top must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
