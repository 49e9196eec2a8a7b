//! Per-repository scan results.

/// Result of scanning a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryOutcome {
    /// No file matched.
    Clean {
        /// Repository full name.
        repository: String,
        /// Whether the repository reported a size of zero.
        empty: bool,
    },

    /// At least one file matched.
    Matched {
        /// Repository full name.
        repository: String,
        /// Browsable URLs of matched files, in traversal order.
        files: Vec<String>,
        /// Whether the repository reported a size of zero.
        empty: bool,
    },
}

impl RepositoryOutcome {
    /// Builds an outcome from the files matched in `repository`.
    pub fn new(repository: String, files: Vec<String>, empty: bool) -> Self {
        if files.is_empty() {
            Self::Clean { repository, empty }
        } else {
            Self::Matched {
                repository,
                files,
                empty,
            }
        }
    }

    /// Returns the repository full name.
    pub fn repository(&self) -> &str {
        match self {
            Self::Clean { repository, .. } | Self::Matched { repository, .. } => repository,
        }
    }

    /// Returns the matched file URLs (empty when clean).
    pub fn files(&self) -> &[String] {
        match self {
            Self::Clean { .. } => &[],
            Self::Matched { files, .. } => files,
        }
    }
}
