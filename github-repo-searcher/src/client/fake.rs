//! In-memory [`GitHubApi`] for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ClientError, EntryKind, GitHubApi, PageInfo, RepositoryPage, RepositorySummary, TreeEntry};

/// Requests seen by a [`FakeApi`], in order.
#[derive(Debug, Default, Clone)]
pub(crate) struct Calls {
    pub repository_pages: Vec<(String, Option<String>)>,
    pub sizes: Vec<String>,
    pub directories: Vec<String>,
    pub files: Vec<String>,
}

/// Serves canned pages, listings and file contents keyed by request.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    pages: HashMap<(String, Option<String>), RepositoryPage>,
    failing: Option<(String, Option<String>)>,
    sizes: HashMap<String, u64>,
    directories: HashMap<String, Vec<TreeEntry>>,
    files: HashMap<String, String>,
    calls: Mutex<Calls>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `names` for `org`'s query with `cursor`, pointing at `next` when given.
    pub fn with_page(
        mut self,
        org: &str,
        cursor: Option<&str>,
        names: &[&str],
        next: Option<&str>,
    ) -> Self {
        let page = RepositoryPage {
            nodes: names
                .iter()
                .map(|name| RepositorySummary {
                    id: format!("R_{name}"),
                    name: (*name).to_string(),
                })
                .collect(),
            page_info: PageInfo {
                has_next_page: next.is_some(),
                end_cursor: next.map(str::to_string),
            },
        };
        self.pages
            .insert((org.to_string(), cursor.map(str::to_string)), page);
        self
    }

    /// Fails `org`'s query with `cursor` with a transport error.
    pub fn with_failing_page(mut self, org: &str, cursor: Option<&str>) -> Self {
        self.failing = Some((org.to_string(), cursor.map(str::to_string)));
        self
    }

    pub fn with_size(mut self, repo: &str, size: u64) -> Self {
        self.sizes.insert(repo.to_string(), size);
        self
    }

    /// Serves `entries` for `repo` at `path`. Unregistered paths list as empty, like a 404.
    pub fn with_directory(mut self, repo: &str, path: &str, entries: Vec<TreeEntry>) -> Self {
        self.directories.insert(format!("{repo}:{path}"), entries);
        self
    }

    pub fn with_file(mut self, url: &str, content: &str) -> Self {
        self.files.insert(url.to_string(), content.to_string());
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }
}

/// A file entry whose content URL is `api/{path}` and browse URL is `html/{path}`.
pub(crate) fn file(path: &str) -> TreeEntry {
    entry(EntryKind::File, path)
}

pub(crate) fn dir(path: &str) -> TreeEntry {
    entry(EntryKind::Dir, path)
}

fn entry(kind: EntryKind, path: &str) -> TreeEntry {
    TreeEntry {
        kind,
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        url: Some(format!("api/{path}")),
        html_url: Some(format!("html/{path}")),
    }
}

#[async_trait]
impl GitHubApi for FakeApi {
    async fn list_repositories(
        &self,
        org: &str,
        cursor: Option<&str>,
    ) -> Result<RepositoryPage, ClientError> {
        let key = (org.to_string(), cursor.map(str::to_string));
        self.calls.lock().unwrap().repository_pages.push(key.clone());
        if self.failing.as_ref() == Some(&key) {
            let source = serde_json::from_str::<serde_json::Value>("").unwrap_err();
            return Err(ClientError::Json {
                context: "connection reset".to_string(),
                source,
            });
        }
        Ok(self.pages.get(&key).cloned().unwrap_or_default())
    }

    async fn repository_size(&self, _org: &str, repo: &str) -> Option<u64> {
        self.calls.lock().unwrap().sizes.push(repo.to_string());
        self.sizes.get(repo).copied()
    }

    async fn list_directory(&self, _org: &str, repo: &str, path: &str) -> Vec<TreeEntry> {
        self.calls.lock().unwrap().directories.push(path.to_string());
        self.directories
            .get(&format!("{repo}:{path}"))
            .cloned()
            .unwrap_or_default()
    }

    async fn file_content(&self, content_url: &str) -> Option<String> {
        self.calls.lock().unwrap().files.push(content_url.to_string());
        self.files.get(content_url).cloned()
    }
}
