//! Directory tree traversal and per-file matching.

use tracing::{debug, trace};

use crate::client::{EntryKind, GitHubApi, TreeEntry};
use crate::matcher::{is_config_file, SearchStrings};

/// Directory every repository is searched under.
pub const DEFAULT_ROOT: &str = ".github";

/// Walks `root` of `org/repo` and returns the URLs of configuration files
/// containing any of `targets`.
///
/// Traversal is depth-first in listing order: a subdirectory's matches
/// appear where the subdirectory sits in its parent's listing. Pending
/// entries are kept on an explicit stack, so tree depth does not grow the
/// call stack. A missing root and a root without matches both yield an
/// empty result.
pub async fn walk<A: GitHubApi + ?Sized>(
    api: &A,
    org: &str,
    repo: &str,
    root: &str,
    targets: &SearchStrings,
) -> Vec<String> {
    let mut matched = Vec::new();
    let mut pending = Vec::new();
    push_listing(&mut pending, api.list_directory(org, repo, root).await);

    while let Some(entry) = pending.pop() {
        match entry.kind {
            EntryKind::File if is_config_file(&entry.name) => {
                if let Some(url) = search_file(api, &entry, targets).await {
                    debug!(org, repo, path = %entry.path, "File matched");
                    matched.push(url);
                }
            }
            EntryKind::Dir => {
                push_listing(&mut pending, api.list_directory(org, repo, &entry.path).await);
            }
            EntryKind::File | EntryKind::Other => {
                trace!(org, repo, path = %entry.path, "Skipping entry");
            }
        }
    }

    matched
}

/// Pushes a listing so that popping returns entries in listing order.
fn push_listing(pending: &mut Vec<TreeEntry>, entries: Vec<TreeEntry>) {
    pending.extend(entries.into_iter().rev());
}

/// Fetches one file and returns its browse URL if the content matches.
async fn search_file<A: GitHubApi + ?Sized>(
    api: &A,
    entry: &TreeEntry,
    targets: &SearchStrings,
) -> Option<String> {
    let content_url = entry.url.as_deref()?;
    let content = api.file_content(content_url).await?;
    if targets.matches(&content) {
        entry.browse_url().map(str::to_string)
    } else {
        None
    }
}
