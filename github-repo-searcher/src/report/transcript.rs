//! Colored console transcript.

use std::fmt::Display;
use std::io::{self, Stdout, Write};

use console::Style;
use tracing::warn;

use super::Reporter;

/// Writes the human-readable scan transcript.
///
/// Section headers are bold, repositories with matches red and clean
/// repositories green. Styling is dropped automatically when stdout is not
/// a terminal.
pub struct ConsoleReporter<W: Write> {
    out: W,
    header: Style,
    found: Style,
    clean: Style,
}

impl ConsoleReporter<Stdout> {
    /// Creates a reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            header: Style::new().bold(),
            found: Style::new().red(),
            clean: Style::new().green(),
        }
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{text}") {
            warn!(error = %e, "Failed to write to console");
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn organization_started(&mut self, org: &str) {
        let header = self.header.apply_to(format!("Searching organization {org}..."));
        self.line(header);
        self.line("");
    }

    fn repository_empty(&mut self, org: &str, repo: &str) {
        self.line(format!("{org}/{repo} is empty, skipping..."));
        self.line("");
    }

    fn repository_started(&mut self, _org: &str, repo: &str) {
        let header = self.header.apply_to(format!("Searching repository {repo}..."));
        self.line(header);
    }

    fn matches_found(&mut self, org: &str, repo: &str, urls: &[String]) {
        let header = self.found.apply_to(format!(
            "Files containing the specified strings in {org}/{repo}"
        ));
        self.line(header);
        self.line("");
        for url in urls {
            self.line(format!(" - {url}"));
        }
        self.line("");
    }

    fn no_matches(&mut self, _org: &str, repo: &str) {
        let notice = self.clean.apply_to(format!(
            "No files containing the specified strings found in {repo}"
        ));
        self.line(notice);
        self.line("");
    }

    fn organization_finished(&mut self, _org: &str) {
        self.line("");
        let header = self
            .header
            .apply_to("The source organization has no more repositories.");
        self.line(header);
        self.line("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(reporter: ConsoleReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn reports_matches_as_a_list() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.repository_started("acme", "infra");
        reporter.matches_found(
            "acme",
            "infra",
            &["https://github.com/acme/infra/blob/main/.github/workflows/ci.yml".to_string()],
        );

        let out = transcript(reporter);
        assert!(out.contains("Searching repository infra..."));
        assert!(out.contains("Files containing the specified strings in acme/infra"));
        assert!(out.contains(" - https://github.com/acme/infra/blob/main/.github/workflows/ci.yml\n"));
    }

    #[test]
    fn reports_clean_and_empty_repositories() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.repository_empty("acme", "scratch");
        reporter.no_matches("acme", "scratch");
        reporter.organization_finished("acme");

        let out = transcript(reporter);
        assert!(out.contains("acme/scratch is empty, skipping..."));
        assert!(out.contains("No files containing the specified strings found in scratch"));
        assert!(out.contains("The source organization has no more repositories."));
    }
}
