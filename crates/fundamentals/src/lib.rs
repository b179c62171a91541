//! # Equilens Fundamentals
//!
//! Margin, profitability, liquidity and leverage ratios from the latest income statement
//! and balance sheet of one instrument.
//!
//! Providers name line items inconsistently ("Total Revenue", "TotalRevenue", "Revenue").
//! Each logical figure is therefore described by a [`LineItem`] with an ordered list of
//! candidate keys, and resolved to the first key the snapshot actually reports. All ratios
//! are computed through [`safe_divide`], so a missing figure or a zero denominator leaves
//! that single ratio undefined.

pub mod division;
pub mod error;
pub mod line_items;
pub mod ratios;

pub use division::safe_divide;
pub use error::FundamentalsError;
pub use line_items::{LineItem, first_defined, resolve, resolve_total_debt};
pub use ratios::{FundamentalRatios, Ratio, fundamental_ratios};
