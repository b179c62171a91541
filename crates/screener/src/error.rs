use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenerError {
    #[error("No instruments were provided to the screener")]
    NoCandidates,

    #[error("Invalid screening criteria: {0}")]
    InvalidCriteria(String),
}
