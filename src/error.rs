//! Error types for hotfeed.

use thiserror::Error;

/// Failure of a single upstream source.
///
/// Any of these on the primary source triggers the fallback source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connection failure or timeout.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    /// Body could not be decoded as the expected format.
    #[error("invalid body: {0}")]
    Body(String),

    /// Body decoded but required fields are missing.
    #[error("malformed entry: {0}")]
    Malformed(String),
}

/// Common error type for hotfeed.
#[derive(Error, Debug)]
pub enum HotfeedError {
    /// Both the primary and the fallback source failed.
    #[error("upstream unavailable (primary: {primary}; fallback: {fallback})")]
    UpstreamUnavailable {
        /// Failure of the primary JSON endpoint.
        primary: String,
        /// Failure of the fallback RSS endpoint.
        fallback: String,
    },

    /// Upstream data was transported fine but lacks required fields.
    #[error("malformed upstream data: {0}")]
    MalformedUpstreamData(String),

    /// Feed document could not be built.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rss::Error> for HotfeedError {
    fn from(e: rss::Error) -> Self {
        HotfeedError::Serialization(e.to_string())
    }
}

/// Result type alias for hotfeed operations.
pub type Result<T> = std::result::Result<T, HotfeedError>;
