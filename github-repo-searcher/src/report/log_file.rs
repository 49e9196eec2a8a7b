//! Match log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use chrono_tz::US::Eastern;

use super::{format_match, MatchLog};

/// File name prefix of match logs.
pub const LOG_FILE_PREFIX: &str = "github_repo_searcher_";

/// Returns the match log file name for a run started at `now`.
///
/// The name carries the date and hour in US Eastern time, so runs started
/// within the same hour append to the same file.
pub fn log_file_name(now: DateTime<Utc>) -> String {
    let local = now.with_timezone(&Eastern);
    format!("{LOG_FILE_PREFIX}{}.log", local.format("%Y-%m-%d-%H"))
}

/// [`MatchLog`] appending to a file opened once for the whole run.
#[derive(Debug)]
pub struct FileMatchLog {
    path: PathBuf,
    file: File,
}

impl FileMatchLog {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatchLog for FileMatchLog {
    fn record(&mut self, org: &str, repo: &str, url: &str) -> io::Result<()> {
        let mut line = format_match(org, repo, url);
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.flush()
    }
}
