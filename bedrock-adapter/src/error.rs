use thiserror::Error;

/// Errors returned by model invocation.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The HTTP request failed to complete (connect error, timeout, etc.).
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status code.
    #[error("model endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, read in full for diagnostics.
        body: String,
    },

    /// The response body could not be decoded as a message envelope.
    #[error("response body was not a valid message envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    /// The client could not be constructed from the given settings.
    #[error("invalid adapter configuration: {0}")]
    Config(String),
}
