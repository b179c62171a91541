//! # Equilens Screener
//!
//! Ranks a universe of instruments by one fundamental ratio.
//!
//! The screener works on ratios that were already computed; acquiring statements and
//! computing their ratios happens upstream, so the same universe can be screened by
//! several metrics without recomputation.

use crate::error::ScreenerError;
use fundamentals::{FundamentalRatios, Ratio};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub mod error;

/// Which ratio to rank by and how many instruments to keep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenCriteria {
    pub metric: Ratio,
    pub top: usize,
}

impl Default for ScreenCriteria {
    fn default() -> Self {
        Self {
            metric: Ratio::ReturnOnEquity,
            top: 10,
        }
    }
}

/// An instrument that passed the screen, with the value it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedInstrument {
    pub rank: usize,
    pub symbol: String,
    pub value: f64,
    pub ratios: FundamentalRatios,
}

/// The main screening engine.
#[derive(Debug, Clone)]
pub struct Screener {
    criteria: ScreenCriteria,
}

impl Screener {
    pub fn new(criteria: ScreenCriteria) -> Result<Self, ScreenerError> {
        if criteria.top == 0 {
            return Err(ScreenerError::InvalidCriteria(
                "top must be greater than 0".to_string(),
            ));
        }
        Ok(Self { criteria })
    }

    pub fn criteria(&self) -> &ScreenCriteria {
        &self.criteria
    }

    /// Filters, sorts, and truncates the universe.
    ///
    /// Instruments whose metric is undefined are dropped. Ties keep symbol order.
    pub fn rank(
        &self,
        universe: &BTreeMap<String, FundamentalRatios>,
    ) -> Result<Vec<RankedInstrument>, ScreenerError> {
        if universe.is_empty() {
            return Err(ScreenerError::NoCandidates);
        }

        let metric = self.criteria.metric;

        // 1. Filter
        let mut scored: Vec<(&String, f64, &FundamentalRatios)> = universe
            .iter()
            .filter_map(|(symbol, ratios)| match ratios.get(metric) {
                Some(value) => Some((symbol, value, ratios)),
                None => {
                    tracing::debug!(symbol = %symbol, %metric, "Dropped from screen: metric undefined.");
                    None
                }
            })
            .collect();

        // 2. Rank
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(self.criteria.top);

        tracing::info!(
            %metric,
            candidates = universe.len(),
            kept = scored.len(),
            "Screen complete."
        );

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(i, (symbol, value, ratios))| RankedInstrument {
                rank: i + 1,
                symbol: symbol.clone(),
                value,
                ratios: *ratios,
            })
            .collect())
    }
}
