//! Run summary types.

use super::result::RepositoryOutcome;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of organizations processed.
    pub organizations_scanned: usize,

    /// Number of organizations whose repository listing failed part-way.
    pub organizations_failed: usize,

    /// Number of repositories walked.
    pub repositories_scanned: usize,

    /// Number of repositories reporting a size of zero.
    pub empty_repositories: usize,

    /// Number of repositories with at least one matched file.
    pub repositories_with_matches: usize,

    /// Total number of matched files.
    pub files_matched: usize,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with a repository outcome.
    pub fn record(&mut self, outcome: &RepositoryOutcome) {
        self.repositories_scanned += 1;
        match outcome {
            RepositoryOutcome::Clean { empty, .. } => {
                if *empty {
                    self.empty_repositories += 1;
                }
            }
            RepositoryOutcome::Matched { files, empty, .. } => {
                if *empty {
                    self.empty_repositories += 1;
                }
                self.repositories_with_matches += 1;
                self.files_matched += files.len();
            }
        }
    }

    /// Returns true if any file matched.
    #[must_use]
    pub fn has_matches(&self) -> bool {
        self.files_matched > 0
    }
}
