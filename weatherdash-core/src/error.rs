use thiserror::Error;

/// Failure modes of a weather query, discriminated so the UI layer can
/// render a specific message for each.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The city name was empty after trimming whitespace. No network
    /// request is made in this case.
    #[error("Please enter a city name.")]
    EmptyCity,

    /// The provider answered 404 for the queried city.
    #[error("City not found. Please check the spelling and try again.")]
    CityNotFound,

    /// Network failure, provider error, or malformed payload.
    #[error("Failed to fetch weather data. Please try again later.")]
    Unavailable(#[source] anyhow::Error),
}

impl QueryError {
    pub(crate) fn unavailable(err: impl Into<anyhow::Error>) -> Self {
        Self::Unavailable(err.into())
    }
}

/// Local key-value storage failure. Never surfaced to a query caller:
/// stores log and swallow these so a persistence problem cannot block
/// weather display.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}
