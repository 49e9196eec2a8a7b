//! Orchestrates organization scans.

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_API_URL};
pub use error::{ConfigError, RunnerError};

use tracing::{error, info, info_span, warn, Instrument};

use crate::client::{GitHubApi, OctocrabClient, RepositorySummary};
use crate::pagination::RepositoryPages;
use crate::report::{MatchLog, Reporter};
use crate::summary::{RepositoryOutcome, RunSummary};
use crate::walker::walk;

/// Scans every repository of the configured organizations.
pub struct Runner<A = OctocrabClient> {
    config: RunnerConfig,
    api: A,
}

impl Runner<OctocrabClient> {
    /// Builds a runner talking to the configured GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Client`] if the HTTP client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let api = OctocrabClient::new(config.base_url(), config.token())?;
        Ok(Self { config, api })
    }
}

impl<A: GitHubApi> Runner<A> {
    /// Builds a runner on top of an existing API implementation.
    pub fn with_api(config: RunnerConfig, api: A) -> Self {
        Self { config, api }
    }

    /// Returns the API implementation.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Scans all organizations in order, one request at a time.
    ///
    /// Failures never abort the run: a failed repository listing ends that
    /// organization, and every other failure degrades to "nothing found".
    pub async fn run(&self, reporter: &mut dyn Reporter, log: &mut dyn MatchLog) -> RunSummary {
        let mut summary = RunSummary::new();

        if self.config.organizations().is_empty() {
            warn!("No organizations to scan");
            return summary;
        }

        for org in self.config.organizations() {
            self.scan_organization(org, reporter, log, &mut summary)
                .instrument(info_span!("organization", org = %org))
                .await;
        }

        info!(
            organizations = summary.organizations_scanned,
            repositories = summary.repositories_scanned,
            files_matched = summary.files_matched,
            "Scan complete"
        );
        summary
    }

    async fn scan_organization(
        &self,
        org: &str,
        reporter: &mut dyn Reporter,
        log: &mut dyn MatchLog,
        summary: &mut RunSummary,
    ) {
        info!("Scanning organization");
        reporter.organization_started(org);
        summary.organizations_scanned += 1;

        let mut pages = RepositoryPages::new(&self.api, org);
        loop {
            let batch = match pages.next_page().await {
                Ok(Some(batch)) => batch,
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "Failed to list repositories");
                    summary.organizations_failed += 1;
                    break;
                }
            };

            for repository in &batch {
                let outcome = self
                    .scan_repository(org, repository, reporter, log)
                    .instrument(info_span!("repository", repo = %repository.name))
                    .await;
                summary.record(&outcome);
            }
        }

        reporter.organization_finished(org);
    }

    async fn scan_repository(
        &self,
        org: &str,
        repository: &RepositorySummary,
        reporter: &mut dyn Reporter,
        log: &mut dyn MatchLog,
    ) -> RepositoryOutcome {
        let repo = repository.name.as_str();

        // A zero size is only reported; the tree is still walked.
        let empty = self.api.repository_size(org, repo).await == Some(0);
        if empty {
            reporter.repository_empty(org, repo);
        }

        reporter.repository_started(org, repo);
        let files = walk(
            &self.api,
            org,
            repo,
            self.config.root(),
            self.config.search_strings(),
        )
        .await;

        if files.is_empty() {
            reporter.no_matches(org, repo);
        } else {
            info!(count = files.len(), "Found matching files");
            for url in &files {
                if let Err(e) = log.record(org, repo, url) {
                    error!(url = %url, error = %e, "Failed to write match log");
                }
            }
            reporter.matches_found(org, repo, &files);
        }

        RepositoryOutcome::new(format!("{org}/{repo}"), files, empty)
    }
}
