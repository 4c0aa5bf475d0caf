use thiserror::Error;

/// Errors returned by [`crate::OpenFoodFactsClient`].
///
/// A product that does not exist is not an error; the client returns
/// `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("Request timeout - please check your internet connection")]
    Timeout,

    /// The food database answered with a non-2xx status.
    #[error("API Error: {status} - {status_text}")]
    Upstream { status: u16, status_text: String },

    /// The food database could not be reached at all.
    #[error("Network error - unable to reach OpenFoodFacts API")]
    Network(#[source] reqwest::Error),

    /// Any other failure, including a response body that is not valid JSON.
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },

    /// The underlying `reqwest::Client` could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FetchError {
    /// Whether repeating the same request later could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            Self::Unexpected { .. } | Self::ClientBuild(_) => false,
        }
    }

    /// Maps a transport-level `reqwest` failure into the fetch taxonomy.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() || error.is_request() {
            Self::Network(error)
        } else {
            Self::Unexpected {
                message: error.to_string(),
            }
        }
    }
}
