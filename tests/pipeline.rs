//! End-to-end scenarios: JSON data directory -> provider -> analytics, ratios, screen, backtest.

use analytics::{AnalyticsEngine, RiskParams};
use approx::assert_relative_eq;
use backtester::buy_and_hold;
use data_provider::{JsonFileProvider, MarketDataProvider, load_price_table, load_statements};
use fundamentals::{FundamentalRatios, Ratio, fundamental_ratios};
use rust_decimal_macros::dec;
use screener::{ScreenCriteria, Screener};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

const PRICES: &str = r#"{
    "2024-01-02": {"AAPL": 100.0, "MSFT": 200.0, "SPY": 400.0, "FLAT": 50.0},
    "2024-01-03": {"AAPL": 104.0, "MSFT": 198.0, "SPY": 404.0, "FLAT": 50.0},
    "2024-01-04": {"AAPL": 101.0, "MSFT": 202.0, "SPY": 402.0, "FLAT": 50.0},
    "2024-01-05": {"AAPL": 107.0, "MSFT": 199.0, "SPY": 408.0, "FLAT": 50.0},
    "2024-01-08": {"AAPL": 110.0, "MSFT": 205.0, "SPY": 410.0, "FLAT": 50.0}
}"#;

const WORKED_EXAMPLE: &str = r#"{
    "income": {"Total Revenue": 200, "Gross Profit": 80, "Net Income": 20},
    "balance": {
        "Total Assets": 500,
        "Total Stockholder Equity": 250,
        "Total Current Assets": 60,
        "Total Current Liabilities": 30,
        "Total Debt": 100
    }
}"#;

const ALIASED: &str = r#"{
    "income": {"TotalRevenue": 1000, "NetIncome": 300},
    "balance": {"StockholdersEquity": 1000, "LongTermDebt": 500}
}"#;

fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("prices.json"), PRICES).unwrap();
    let statements = dir.path().join("statements");
    fs::create_dir(&statements).unwrap();
    fs::write(statements.join("AAPL.json"), WORKED_EXAMPLE).unwrap();
    fs::write(statements.join("MSFT.json"), ALIASED).unwrap();
    fs::write(statements.join("FLAT.json"), r#"{"income": {"Total Revenue": 0}}"#).unwrap();
    dir
}

#[test]
fn risk_report_from_files() {
    let dir = data_dir();
    let provider = JsonFileProvider::new(dir.path());
    let prices = load_price_table(&provider, &["AAPL", "MSFT", "FLAT", "SPY"], None, None);
    assert_eq!(prices.len(), 5);

    let report = AnalyticsEngine::default().calculate(&prices, Some("SPY"));
    assert_eq!(report.metrics.len(), 4);

    let aapl = report.get("AAPL").unwrap();
    assert!(aapl.volatility.unwrap() > 0.0);
    assert!(aapl.sharpe_ratio.unwrap() > 0.0);
    assert_relative_eq!(aapl.max_drawdown.unwrap(), 101.0 / 104.0 - 1.0, epsilon = 1e-12);
    assert!(aapl.beta.is_some());

    let flat = report.get("FLAT").unwrap();
    assert_eq!(flat.volatility, Some(0.0));
    assert_eq!(flat.sharpe_ratio, None);
    assert_eq!(flat.max_drawdown, Some(0.0));
    assert_eq!(flat.beta, Some(0.0));
}

#[test]
fn sharpe_is_unchanged_by_rescaling_prices() {
    let dir = data_dir();
    let scaled_dir = tempfile::tempdir().unwrap();
    let unscaled = load_price_table(&JsonFileProvider::new(dir.path()), &["AAPL"], None, None);

    let scaled_json = serde_json::to_string(&unscaled.map_columns(|values| {
        values.iter().map(|v| v.map(|p| p * 7.5)).collect()
    }))
    .unwrap();
    fs::write(scaled_dir.path().join("prices.json"), scaled_json).unwrap();
    let scaled = load_price_table(&JsonFileProvider::new(scaled_dir.path()), &["AAPL"], None, None);

    let engine = AnalyticsEngine::new(RiskParams {
        trading_periods: 252,
        risk_free_rate: 0.03,
    })
    .unwrap();
    let a = engine.calculate(&unscaled, None).get("AAPL").unwrap().sharpe_ratio.unwrap();
    let b = engine.calculate(&scaled, None).get("AAPL").unwrap().sharpe_ratio.unwrap();
    assert_relative_eq!(a, b, max_relative = 1e-9);
}

#[test]
fn missing_data_degrades_instead_of_failing() {
    let dir = data_dir();
    let provider = JsonFileProvider::new(dir.path());

    let prices = load_price_table(&provider, &["DELISTED"], None, None);
    assert!(prices.is_empty());
    assert!(AnalyticsEngine::default().calculate(&prices, Some("SPY")).is_empty());

    let statements = provider.fetch_statements("DELISTED").into_inner_or_default();
    let ratios = fundamental_ratios(&statements);
    assert_eq!(ratios, FundamentalRatios::default());
}

#[test]
fn ratios_from_files_resolve_aliases() {
    let dir = data_dir();
    let provider = JsonFileProvider::new(dir.path());

    let aapl = fundamental_ratios(&provider.fetch_statements("AAPL").ok().unwrap());
    assert_relative_eq!(aapl.gross_margin.unwrap(), 0.4);
    assert_relative_eq!(aapl.net_margin.unwrap(), 0.1);
    assert_relative_eq!(aapl.return_on_assets.unwrap(), 0.04);
    assert_relative_eq!(aapl.return_on_equity.unwrap(), 0.08);
    assert_relative_eq!(aapl.current_ratio.unwrap(), 2.0);
    assert_relative_eq!(aapl.debt_to_equity.unwrap(), 0.4);

    let msft_statements = provider.fetch_statements("MSFT").ok().unwrap();
    assert_eq!(
        msft_statements.balance.as_ref().unwrap().get("LongTermDebt"),
        Some(dec!(500))
    );
    let msft = fundamental_ratios(&msft_statements);
    assert_relative_eq!(msft.net_margin.unwrap(), 0.3);
    assert_relative_eq!(msft.return_on_equity.unwrap(), 0.3);
    assert_relative_eq!(msft.debt_to_equity.unwrap(), 0.5);
    assert_eq!(msft.return_on_assets, None);
}

#[test]
fn screen_ranks_loaded_universe() {
    let dir = data_dir();
    let provider = JsonFileProvider::new(dir.path());
    let universe: BTreeMap<String, FundamentalRatios> =
        load_statements(&provider, &["AAPL", "MSFT", "FLAT", "DELISTED"])
            .into_iter()
            .map(|(symbol, statements)| (symbol, fundamental_ratios(&statements)))
            .collect();

    let screener = Screener::new(ScreenCriteria {
        metric: "roe".parse::<Ratio>().unwrap(),
        top: 10,
    })
    .unwrap();
    let ranked = screener.rank(&universe).unwrap();

    let symbols: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["MSFT", "AAPL"]);
}

#[test]
fn buy_and_hold_from_files() {
    let dir = data_dir();
    let provider = JsonFileProvider::new(dir.path());
    let prices = load_price_table(&provider, &["AAPL", "SPY"], None, None);

    let result = buy_and_hold(&prices, "AAPL", "SPY");
    assert_relative_eq!(result.ticker_return.unwrap(), 0.1, epsilon = 1e-12);
    assert_relative_eq!(result.benchmark_return.unwrap(), 0.025, epsilon = 1e-12);
    assert_relative_eq!(result.excess_return.unwrap(), 0.075, epsilon = 1e-12);
    assert_eq!(result.cumulative.len(), 4);
}

#[test]
fn non_numeric_line_item_only_affects_itself() {
    let dir = data_dir();
    fs::write(
        dir.path().join("statements").join("IBM.json"),
        r#"{
            "income": {"Total Revenue": 200, "Gross Profit": 80, "Currency": "USD"},
            "balance": {"Total Current Assets": 60, "Total Current Liabilities": 30}
        }"#,
    )
    .unwrap();
    let provider = JsonFileProvider::new(dir.path());

    let statements = provider.fetch_statements("IBM");
    assert!(statements.is_available());
    let ratios = fundamental_ratios(&statements.into_inner_or_default());
    assert_relative_eq!(ratios.gross_margin.unwrap(), 0.4);
    assert_relative_eq!(ratios.current_ratio.unwrap(), 2.0);
    assert_eq!(ratios.net_margin, None);
}
