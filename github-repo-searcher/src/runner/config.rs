//! Runner configuration.

use url::Url;

use super::error::ConfigError;
use crate::client::graphql_endpoint;
use crate::matcher::SearchStrings;
use crate::walker::DEFAULT_ROOT;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Configuration for a scan run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Token presented as a bearer credential.
    token: String,
    /// REST API base URL, without a trailing slash.
    base_url: String,
    /// Organization logins, trimmed, in input order.
    organizations: Vec<String>,
    /// Strings searched for in configuration files.
    search_strings: SearchStrings,
    /// Directory searched in every repository.
    root: String,
}

impl RunnerConfig {
    /// Creates and validates the configuration for a run.
    ///
    /// Organization names are trimmed and blank ones dropped. An empty
    /// `search_strings` list falls back to the default target.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] for an empty token and
    /// [`ConfigError::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn new(
        token: &str,
        base_url: &str,
        organizations: Vec<String>,
        search_strings: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            source: e,
        })?;

        let organizations = organizations
            .iter()
            .map(|org| org.trim())
            .filter(|org| !org.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            token: token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            organizations,
            search_strings: SearchStrings::new(search_strings),
            root: DEFAULT_ROOT.to_string(),
        })
    }

    /// Sets the directory searched in every repository.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Returns the configured token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the REST API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the GraphQL endpoint derived from the base URL.
    pub fn graphql_url(&self) -> String {
        graphql_endpoint(&self.base_url)
    }

    /// Returns the organizations to scan.
    pub fn organizations(&self) -> &[String] {
        &self.organizations
    }

    /// Returns the strings searched for.
    pub fn search_strings(&self) -> &SearchStrings {
        &self.search_strings
    }

    /// Returns the directory searched in every repository.
    pub fn root(&self) -> &str {
        &self.root
    }
}
