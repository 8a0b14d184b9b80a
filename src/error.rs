use thiserror::Error;

/// Errors that can occur while scanning a product label
#[derive(Error, Debug)]
pub enum ScanError {
    /// HTTP request to an external service failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The vision API reported an error for the submitted image
    #[error("Vision API error: {0}")]
    Vision(String),

    /// The vision API returned no text annotations for the image
    #[error("No text detected in image")]
    NoTextDetected,

    /// An analysis provider failed or was misconfigured
    #[error("Analysis provider error: {0}")]
    Provider(String),

    /// The provider answered, but not with the JSON shape we asked for
    #[error("Failed to parse analysis response: {reason}")]
    MalformedAnalysis {
        reason: String,
        /// Verbatim provider output, kept for debugging
        raw_response: String,
    },

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),

    /// An external call exceeded the configured deadline
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    /// Failed to read an image file from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
