use std::path::PathBuf;
use thiserror::Error;

/// Why a fetch failed. Callers only ever see this as the reason of an
/// [`Acquisition::Unavailable`](crate::Acquisition::Unavailable).
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No price history for symbol: {0}")]
    UnknownSymbol(String),

    #[error("Invalid symbol: '{0}'")]
    InvalidSymbol(String),
}
