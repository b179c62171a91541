use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Risk parameters are invalid: {0}")]
    InvalidParameters(String),
}
