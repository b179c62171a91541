use crate::acquisition::Acquisition;
use crate::error::ProviderError;
use crate::{MarketDataProvider, history_for};
use chrono::NaiveDate;
use core_types::{FinancialStatements, PriceTable};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const PRICES_FILE: &str = "prices.json";
pub const STATEMENTS_DIR: &str = "statements";

/// Reads market data from a directory of JSON files:
///
/// ```text
/// <root>/prices.json                 {"2024-01-02": {"AAPL": 185.6, "SPY": 472.7}, ...}
/// <root>/statements/<SYMBOL>.json    {"income": {"Total Revenue": 383285000000, ...},
///                                     "balance": {...}}
/// ```
///
/// `prices.json` is parsed on the first successful price fetch and reused afterwards.
/// Statement files are small and read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    root: PathBuf,
    prices: OnceLock<PriceTable>,
}

impl JsonFileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prices: OnceLock::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The parsed price file. A failed read is not cached, so a later fetch retries.
    fn prices(&self) -> Result<&PriceTable, ProviderError> {
        if let Some(prices) = self.prices.get() {
            return Ok(prices);
        }
        let prices = read_json::<PriceTable>(&self.root.join(PRICES_FILE))?;
        Ok(self.prices.get_or_init(|| prices))
    }

    fn statements_path(&self, symbol: &str) -> Result<PathBuf, ProviderError> {
        let valid = !symbol.is_empty()
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '_'))
            && !symbol.contains("..");
        if !valid {
            return Err(ProviderError::InvalidSymbol(symbol.to_string()));
        }
        Ok(self.root.join(STATEMENTS_DIR).join(format!("{symbol}.json")))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ProviderError> {
    let contents = fs::read_to_string(path).map_err(|source| ProviderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ProviderError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl MarketDataProvider for JsonFileProvider {
    fn fetch_price_history(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Acquisition<PriceTable> {
        let result = self
            .prices()
            .and_then(|prices| history_for(prices, symbol, start, end));
        Acquisition::from_result(symbol, "prices", result)
    }

    fn fetch_statements(&self, symbol: &str) -> Acquisition<FinancialStatements> {
        let result = self
            .statements_path(symbol)
            .and_then(|path| read_json::<FinancialStatements>(&path));
        Acquisition::from_result(symbol, "statements", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn data_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PRICES_FILE),
            r#"{
                "2024-01-02": {"AAPL": 100.0, "SPY": 400.0},
                "2024-01-03": {"AAPL": 101.0, "SPY": null},
                "2024-01-04": {"AAPL": null, "SPY": 404.0}
            }"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join(STATEMENTS_DIR)).unwrap();
        fs::write(
            dir.path().join(STATEMENTS_DIR).join("AAPL.json"),
            r#"{"income": {"Total Revenue": 200, "Net Income": null}}"#,
        )
        .unwrap();
        fs::write(dir.path().join(STATEMENTS_DIR).join("BAD.json"), "{not json").unwrap();
        dir
    }

    #[test]
    fn reads_one_symbol_and_drops_its_empty_rows() {
        let dir = data_dir();
        let provider = JsonFileProvider::new(dir.path());

        let history = provider.fetch_price_history("AAPL", None, None).ok().unwrap();
        assert_eq!(history.symbols(), &["AAPL".to_string()]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn applies_the_date_window() {
        let dir = data_dir();
        let provider = JsonFileProvider::new(dir.path());
        let start = NaiveDate::from_ymd_opt(2024, 1, 3);

        let history = provider.fetch_price_history("SPY", start, None).ok().unwrap();
        assert_eq!(history.dates(), &[NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()]);
    }

    #[test]
    fn unknown_symbol_and_missing_files_are_unavailable() {
        let dir = data_dir();
        let provider = JsonFileProvider::new(dir.path());
        assert!(!provider.fetch_price_history("MSFT", None, None).is_available());
        assert!(!provider.fetch_statements("MSFT").is_available());

        let empty = tempfile::tempdir().unwrap();
        let provider = JsonFileProvider::new(empty.path());
        assert!(provider.fetch_price_history("AAPL", None, None).into_inner_or_default().is_empty());
    }

    #[test]
    fn price_file_is_parsed_once() {
        let dir = data_dir();
        let provider = JsonFileProvider::new(dir.path());
        assert!(provider.fetch_price_history("AAPL", None, None).is_available());

        fs::remove_file(dir.path().join(PRICES_FILE)).unwrap();
        let spy = provider.fetch_price_history("SPY", None, None).ok().unwrap();
        assert_eq!(spy.len(), 2);
    }

    #[test]
    fn failed_price_read_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonFileProvider::new(dir.path());
        assert!(!provider.fetch_price_history("AAPL", None, None).is_available());

        fs::write(dir.path().join(PRICES_FILE), r#"{"2024-01-02": {"AAPL": 1.0}}"#).unwrap();
        assert!(provider.fetch_price_history("AAPL", None, None).is_available());
    }

    #[test]
    fn reads_statements_and_skips_null_items() {
        let dir = data_dir();
        let provider = JsonFileProvider::new(dir.path());

        let statements = provider.fetch_statements("AAPL").ok().unwrap();
        let income = statements.income.unwrap();
        assert_eq!(income.get("Total Revenue"), Some(dec!(200)));
        assert!(!income.contains("Net Income"));
        assert!(statements.balance.is_none());
    }

    #[test]
    fn malformed_or_suspicious_requests_are_unavailable() {
        let dir = data_dir();
        let provider = JsonFileProvider::new(dir.path());
        assert!(!provider.fetch_statements("BAD").is_available());
        assert!(!provider.fetch_statements("../prices").is_available());
        assert!(!provider.fetch_statements("").is_available());
    }
}
