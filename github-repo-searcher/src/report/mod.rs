//! Scan output: the console transcript and the persistent match log.
//!
//! Both sinks are passed to [`Runner::run`](crate::Runner::run) explicitly,
//! so tests can capture output without touching the terminal or the
//! filesystem.

mod log_file;
mod transcript;

pub use log_file::{log_file_name, FileMatchLog, LOG_FILE_PREFIX};
pub use transcript::ConsoleReporter;

use std::io;

/// Receives progress notices while a scan runs.
pub trait Reporter {
    /// A new organization is about to be listed.
    fn organization_started(&mut self, org: &str);

    /// The repository reported a size of zero.
    fn repository_empty(&mut self, org: &str, repo: &str);

    /// The repository's tree is about to be walked.
    fn repository_started(&mut self, org: &str, repo: &str);

    /// One or more files of the repository matched.
    fn matches_found(&mut self, org: &str, repo: &str, urls: &[String]);

    /// No file of the repository matched.
    fn no_matches(&mut self, org: &str, repo: &str);

    /// All pages of the organization have been processed.
    fn organization_finished(&mut self, org: &str);
}

/// Append-only record of matched files.
pub trait MatchLog {
    /// Records one matched file as `org/repo: url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry could not be written.
    fn record(&mut self, org: &str, repo: &str, url: &str) -> io::Result<()>;
}

/// Formats a match log line, without the trailing newline.
pub fn format_match(org: &str, repo: &str, url: &str) -> String {
    format!("{org}/{repo}: {url}")
}

impl MatchLog for Vec<String> {
    fn record(&mut self, org: &str, repo: &str, url: &str) -> io::Result<()> {
        self.push(format_match(org, repo, url));
        Ok(())
    }
}
