use thiserror::Error;

/// Result type alias using `LastfmError`
pub type Result<T> = std::result::Result<T, LastfmError>;

/// Errors from the Last.fm client
#[derive(Error, Debug)]
pub enum LastfmError {
    /// Transport or decode failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status from the service
    #[error("Last.fm returned status {status}")]
    Api {
        /// HTTP status code
        status: u16,
    },

    /// Client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}
