use crate::acquisition::Acquisition;
use crate::{MarketDataProvider, history_for};
use chrono::NaiveDate;
use core_types::{FinancialStatements, PriceTable};
use std::collections::HashMap;

/// Serves data held in memory. Used in tests and when data was loaded elsewhere.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    prices: PriceTable,
    statements: HashMap<String, FinancialStatements>,
}

impl InMemoryProvider {
    pub fn new(prices: PriceTable) -> Self {
        Self {
            prices,
            statements: HashMap::new(),
        }
    }

    pub fn with_statements(
        mut self,
        symbol: impl Into<String>,
        statements: FinancialStatements,
    ) -> Self {
        self.statements.insert(symbol.into(), statements);
        self
    }
}

impl MarketDataProvider for InMemoryProvider {
    fn fetch_price_history(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Acquisition<PriceTable> {
        Acquisition::from_result(symbol, "prices", history_for(&self.prices, symbol, start, end))
    }

    fn fetch_statements(&self, symbol: &str) -> Acquisition<FinancialStatements> {
        match self.statements.get(symbol) {
            Some(statements) => Acquisition::Available(statements.clone()),
            None => {
                tracing::warn!(symbol, "No statements held for symbol.");
                Acquisition::unavailable(format!("no statements for {symbol}"))
            }
        }
    }
}
