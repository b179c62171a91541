use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FundamentalsError {
    #[error("Unknown ratio '{0}'. Expected one of: {1}")]
    UnknownRatio(String, String),
}
