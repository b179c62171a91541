use analytics::{AnalyticsEngine, RiskMetrics, RiskParams};
use anyhow::{Context, Result, bail, ensure};
use backtester::buy_and_hold;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use configuration::Config;
use data_provider::{JsonFileProvider, load_price_table, load_statements};
use fundamentals::{FundamentalRatios, Ratio, fundamental_ratios};
use screener::{ScreenCriteria, Screener};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The main entry point for the Equilens analysis tool.
fn main() -> Result<()> {
    // Environment overrides (EQUILENS__*, RUST_LOG) may live in a .env file.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _log_guard =
        configuration::init_logging(&config.logging).context("Failed to initialize logging")?;

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &config, cli.json),
        Commands::Screen(args) => handle_screen(args, &config, cli.json),
        Commands::Backtest(args) => handle_backtest(args, &config, cli.json),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Risk and fundamentals analysis for equity portfolios.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./equilens.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute risk metrics and fundamental ratios for a set of instruments.
    Analyze(AnalyzeArgs),
    /// Rank instruments by one fundamental ratio.
    Screen(ScreenArgs),
    /// Compare a buy-and-hold position against the benchmark.
    Backtest(BacktestArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Directory holding prices.json and statements/<SYMBOL>.json.
    #[arg(long)]
    data_dir: PathBuf,

    /// The symbols to analyze (e.g., "AAPL,MSFT"). Falls back to the configured tickers.
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    tickers: Vec<String>,

    /// The symbol betas are measured against (e.g., "SPY").
    #[arg(long)]
    benchmark: Option<String>,

    /// The first date of the analysis window (format: YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// The last date of the analysis window (format: YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Annual risk-free rate as a fraction, not a percent (0.02 means 2%).
    #[arg(long)]
    rf: Option<f64>,
}

#[derive(Parser)]
struct ScreenArgs {
    #[arg(long)]
    data_dir: PathBuf,

    /// The universe to screen. Falls back to the configured tickers.
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    tickers: Vec<String>,

    /// The ratio to rank by (e.g., "ROE", "Net Margin", "debt_to_equity").
    #[arg(long)]
    metric: Option<String>,

    /// How many instruments to keep.
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Parser)]
struct BacktestArgs {
    #[arg(long)]
    data_dir: PathBuf,

    /// The instrument held.
    #[arg(long)]
    ticker: String,

    #[arg(long)]
    benchmark: Option<String>,

    #[arg(long)]
    start: Option<NaiveDate>,

    #[arg(long)]
    end: Option<NaiveDate>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_analyze(args: AnalyzeArgs, config: &Config, json: bool) -> Result<()> {
    let tickers = resolve_tickers(args.tickers, config)?;
    let benchmark = normalize_symbol(
        args.benchmark
            .as_deref()
            .unwrap_or(&config.analysis.benchmark),
    );
    let (start, end) = resolve_window(args.start, args.end, config)?;

    let engine = AnalyticsEngine::new(RiskParams {
        trading_periods: config.analysis.trading_periods,
        risk_free_rate: args.rf.unwrap_or(config.analysis.risk_free_rate),
    })?;

    tracing::info!(
        tickers = ?tickers,
        %benchmark,
        ?start,
        ?end,
        "Starting analysis."
    );

    let provider = JsonFileProvider::new(&args.data_dir);
    let mut symbols = tickers.clone();
    if !symbols.contains(&benchmark) {
        symbols.push(benchmark.clone());
    }

    let prices = load_price_table(&provider, &symbols, start, end);
    if prices.is_empty() {
        tracing::warn!("No price data available; risk metrics are undefined.");
    }
    let report = engine.calculate(&prices, Some(&benchmark));

    let ratios: BTreeMap<String, FundamentalRatios> = load_statements(&provider, &tickers)
        .into_iter()
        .map(|(symbol, statements)| (symbol, fundamental_ratios(&statements)))
        .collect();

    if json {
        let output = serde_json::json!({ "risk": report, "fundamentals": ratios });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let mut risk_table = new_table(["Symbol", "Volatility", "Sharpe", "Max Drawdown", "Beta"]);
    for ticker in &tickers {
        let metrics: RiskMetrics = report.get(ticker).copied().unwrap_or_default();
        risk_table.add_row(vec![
            Cell::new(ticker),
            number_cell(metrics.volatility),
            number_cell(metrics.sharpe_ratio),
            number_cell(metrics.max_drawdown),
            number_cell(metrics.beta),
        ]);
    }
    println!("Risk metrics (benchmark: {benchmark})");
    println!("{risk_table}");

    let mut header = vec!["Symbol".to_string()];
    header.extend(Ratio::ALL.iter().map(|ratio| ratio.to_string()));
    let mut fundamentals_table = new_table(header);
    for (symbol, values) in &ratios {
        let mut row = vec![Cell::new(symbol)];
        row.extend(values.iter().map(|(_, value)| number_cell(value)));
        fundamentals_table.add_row(row);
    }
    println!("Fundamental ratios");
    println!("{fundamentals_table}");

    Ok(())
}

fn handle_screen(args: ScreenArgs, config: &Config, json: bool) -> Result<()> {
    let tickers = resolve_tickers(args.tickers, config)?;
    let metric_name = args.metric.unwrap_or_else(|| config.screener.metric.clone());
    let metric: Ratio = metric_name.parse()?;
    let screener = Screener::new(ScreenCriteria {
        metric,
        top: args.top.unwrap_or(config.screener.top),
    })?;

    tracing::info!(universe = tickers.len(), %metric, "Starting screen.");

    let provider = JsonFileProvider::new(&args.data_dir);
    let universe: BTreeMap<String, FundamentalRatios> = load_statements(&provider, &tickers)
        .into_iter()
        .map(|(symbol, statements)| (symbol, fundamental_ratios(&statements)))
        .collect();

    let ranked = screener.rank(&universe)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    let mut table = new_table(["Rank".to_string(), "Symbol".to_string(), metric.to_string()]);
    for instrument in &ranked {
        table.add_row(vec![
            Cell::new(instrument.rank).set_alignment(CellAlignment::Right),
            Cell::new(&instrument.symbol),
            number_cell(Some(instrument.value)),
        ]);
    }
    println!("Top {} of {} by {metric}", ranked.len(), universe.len());
    println!("{table}");

    Ok(())
}

fn handle_backtest(args: BacktestArgs, config: &Config, json: bool) -> Result<()> {
    let benchmark = normalize_symbol(
        args.benchmark
            .as_deref()
            .unwrap_or(&config.analysis.benchmark),
    );
    let (start, end) = resolve_window(args.start, args.end, config)?;

    let ticker = normalize_symbol(&args.ticker);

    let provider = JsonFileProvider::new(&args.data_dir);
    let prices = load_price_table(&provider, &[ticker.as_str(), benchmark.as_str()], start, end);
    let result = buy_and_hold(&prices, &ticker, &benchmark);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let mut table = new_table(["Leg", "Symbol", "Cumulative Return"]);
    table.add_row(vec![
        Cell::new("Strategy"),
        Cell::new(&result.ticker),
        number_cell(result.ticker_return),
    ]);
    table.add_row(vec![
        Cell::new("Benchmark"),
        Cell::new(&result.benchmark),
        number_cell(result.benchmark_return),
    ]);
    table.add_row(vec![Cell::new("Excess"), Cell::new(""), number_cell(result.excess_return)]);
    println!("Buy and hold over {} periods", result.cumulative.len());
    println!("{table}");

    Ok(())
}

// ==============================================================================
// Helpers
// ==============================================================================

fn resolve_tickers(tickers: Vec<String>, config: &Config) -> Result<Vec<String>> {
    let tickers = if tickers.is_empty() {
        config.analysis.tickers.clone()
    } else {
        tickers
    };
    let tickers: Vec<String> = tickers
        .iter()
        .map(|ticker| normalize_symbol(ticker))
        .filter(|ticker| !ticker.is_empty())
        .collect();
    if tickers.is_empty() {
        bail!("No tickers given; pass --tickers or set analysis.tickers in the configuration");
    }
    Ok(tickers)
}

/// Symbols are matched case-sensitively in the data files, which use upper case.
fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

fn resolve_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    config: &Config,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    let start = start.or(config.analysis.start_date);
    let end = end.or(config.analysis.end_date);
    if let (Some(s), Some(e)) = (start, end) {
        ensure!(s <= e, "Start date {s} is after end date {e}");
    }
    Ok((start, end))
}

fn new_table<I, T>(header: I) -> Table
where
    I: IntoIterator<Item = T>,
    T: Into<Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Three decimals; undefined values print as "-".
fn number_cell(value: Option<f64>) -> Cell {
    let text = match value {
        Some(v) => format!("{v:.3}"),
        None => "-".to_string(),
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickers_are_upper_cased() {
        let tickers = resolve_tickers(vec!["aapl".into(), " Msft ".into()], &Config::default()).unwrap();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn configured_tickers_are_used_and_normalized() {
        let mut config = Config::default();
        config.analysis.tickers = vec!["googl".into()];
        assert_eq!(resolve_tickers(Vec::new(), &config).unwrap(), vec!["GOOGL"]);
        assert!(resolve_tickers(vec!["  ".into()], &Config::default()).is_err());
    }

    #[test]
    fn lower_case_benchmark_is_normalized() {
        let cli = Cli::try_parse_from([
            "equilens", "backtest", "--data-dir", "data", "--ticker", "aapl", "--benchmark", "spy",
        ])
        .unwrap();
        let Commands::Backtest(args) = cli.command else {
            panic!("expected the backtest command");
        };
        assert_eq!(normalize_symbol(&args.ticker), "AAPL");
        assert_eq!(normalize_symbol(args.benchmark.as_deref().unwrap()), "SPY");
    }

    #[test]
    fn risk_free_rate_is_a_fraction() {
        let cli = Cli::try_parse_from([
            "equilens", "analyze", "--data-dir", "data", "--tickers", "AAPL", "--rf", "0.02",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected the analyze command");
        };
        assert_eq!(args.rf, Some(0.02));
    }
}
