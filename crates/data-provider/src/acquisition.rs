use crate::error::ProviderError;

/// The outcome of a fetch.
///
/// Acquisition failures are expected (delisted tickers, missing statements, network
/// trouble), so they are values rather than errors. The analytics accept the empty
/// value in place of missing data, see [`Acquisition::into_inner_or_default`].
#[derive(Debug, Clone, PartialEq)]
pub enum Acquisition<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> Acquisition<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Acquisition::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Acquisition::Available(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Acquisition::Available(value) => Some(value),
            Acquisition::Unavailable { .. } => None,
        }
    }

    /// The fetched value, or the empty value (`T::default()`) when the fetch failed.
    pub fn into_inner_or_default(self) -> T
    where
        T: Default,
    {
        self.ok().unwrap_or_default()
    }

    /// Converts a provider result, logging the failure with the symbol and data kind.
    pub(crate) fn from_result(symbol: &str, kind: &str, result: Result<T, ProviderError>) -> Self {
        match result {
            Ok(value) => Acquisition::Available(value),
            Err(e) => {
                tracing::warn!(symbol, kind, error = %e, "Data acquisition failed.");
                Acquisition::unavailable(e.to_string())
            }
        }
    }
}
