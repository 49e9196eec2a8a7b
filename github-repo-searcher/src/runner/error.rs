//! Runner error types.

use thiserror::Error;

/// Errors in the run configuration, detected before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No access token was supplied.
    #[error(
        "token not supplied with '--token' flag or by using the 'GITHUB_TOKEN' environment variable. Aborting..."
    )]
    MissingToken,

    /// The API base URL could not be parsed.
    #[error("Invalid API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that can occur while setting up a run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Client(#[from] crate::client::ClientError),

    /// The match log could not be opened.
    #[error("Failed to open match log '{path}': {source}")]
    Log {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
