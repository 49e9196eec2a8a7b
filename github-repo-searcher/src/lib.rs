#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod client;
pub mod matcher;
pub mod pagination;
pub mod report;
pub mod runner;
pub mod summary;
pub mod walker;

pub use client::{
    graphql_endpoint, ClientError, EntryKind, GitHubApi, OctocrabClient, PageInfo,
    RepositoryPage, RepositorySummary, TreeEntry,
};
pub use matcher::{is_config_file, matches, SearchStrings, DEFAULT_SEARCH_STRING};
pub use pagination::RepositoryPages;
pub use report::{
    format_match, log_file_name, ConsoleReporter, FileMatchLog, MatchLog, Reporter,
    LOG_FILE_PREFIX,
};
pub use runner::{ConfigError, Runner, RunnerConfig, RunnerError, DEFAULT_API_URL};
pub use summary::{RepositoryOutcome, RunSummary};
pub use walker::{walk, DEFAULT_ROOT};
