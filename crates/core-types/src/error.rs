use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Symbol '{0}' appears more than once in the table")]
    DuplicateSymbol(String),

    #[error("Column '{symbol}' has {found} values but the date axis has {expected}")]
    LengthMismatch {
        symbol: String,
        expected: usize,
        found: usize,
    },
}
