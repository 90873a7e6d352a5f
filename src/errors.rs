//! Error types for page inspection
//!
//! Extraction itself never fails: every pass degrades to an empty or default
//! value. These errors only arise at the page-source boundary (browser
//! evaluation, snapshot decoding) and in configuration.

/// Error types for page inspection operations
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Browser launch, navigation or script evaluation failed
    #[error("Browser error: {0}")]
    Browser(String),

    /// A snapshot returned by the page could not be decoded
    #[error("Failed to decode {what} snapshot: {source}")]
    Snapshot {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The page URL or base URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Reading an HTML or timeline file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The inspection task was dropped before producing a report
    #[error("Inspection was cancelled")]
    Cancelled,
}

impl From<anyhow::Error> for InspectError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the full context chain
        Self::Browser(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `InspectError`
pub type InspectResult<T> = Result<T, InspectError>;
