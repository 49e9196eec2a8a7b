//! API client error types.

use thiserror::Error;

/// Errors that can occur while talking to the GitHub API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport or client construction failure.
    #[error("GitHub API error: {0}")]
    Http(#[from] octocrab::Error),

    /// API base URL cannot have request paths appended to it.
    #[error("Invalid GitHub API base URL '{0}'")]
    BaseUrl(String),

    /// Response body could not be parsed.
    #[error("Failed to parse {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// File content was not valid base64.
    #[error("Failed to decode file content: {0}")]
    Decode(#[from] base64::DecodeError),
}
