//! # Equilens Core Types
//!
//! Layer 0 of the workspace. Every other crate speaks in terms of the values defined here:
//! date-indexed price and return tables, and the income/balance statement snapshots used by
//! the fundamentals engine.
//!
//! Nothing in this crate performs I/O. All values are plain data that can be cloned,
//! compared and serialized.

pub mod error;
pub mod statements;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use statements::{FinancialStatements, StatementFamily, StatementSnapshot};
pub use table::{PriceTable, ReturnTable, TimeSeriesTable};
