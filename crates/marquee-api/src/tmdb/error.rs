use thiserror::Error;

/// Errors from the TMDB metadata provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("missing TMDB API key")]
    MissingCredentials,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered 2xx but flagged the body with `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("parse error: {0}")]
    Parse(String),
}
