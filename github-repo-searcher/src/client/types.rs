//! Wire types for repository listing, directory listing and blob content.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::warn;

use super::error::ClientError;

/// GraphQL query listing up to 100 repositories of an organization after a cursor.
pub const REPOSITORIES_QUERY: &str = r#"
query GetRepos($org: String!, $cursor: String) {
  organization(login: $org) {
    repositories(first: 100, after: $cursor) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        id
        name
      }
    }
  }
}
"#;

/// Summary of one repository returned by the listing query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositorySummary {
    /// Opaque node id.
    pub id: String,

    /// Repository name.
    pub name: String,
}

/// Pagination metadata of a repository listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page follows this one.
    #[serde(default)]
    pub has_next_page: bool,

    /// Cursor to pass to fetch the following page.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of an organization's repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryPage {
    /// Repositories on this page, in API order.
    pub nodes: Vec<RepositorySummary>,

    /// Pagination metadata.
    pub page_info: PageInfo,
}

impl RepositoryPage {
    /// A page with no repositories and no successor.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<GraphQlData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Default, Deserialize)]
struct GraphQlData {
    #[serde(default)]
    organization: Option<Organization>,
}

#[derive(Debug, Default, Deserialize)]
struct Organization {
    #[serde(default)]
    repositories: Option<RepositoryConnection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryConnection {
    #[serde(default)]
    page_info: Option<PageInfo>,
    #[serde(default)]
    nodes: Vec<Option<RepositorySummary>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
}

/// Parses a repository listing response.
///
/// Missing fields are read as "no more data": a body that is not JSON, or
/// lacks `data.organization.repositories`, yields [`RepositoryPage::empty`].
/// GraphQL errors are logged but do not fail the call.
pub fn parse_repository_page(org: &str, body: &str) -> RepositoryPage {
    let response: GraphQlResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            warn!(org, error = %e, "Malformed repository listing response");
            return RepositoryPage::empty();
        }
    };

    for error in &response.errors {
        warn!(org, message = %error.message, "Repository listing returned an error");
    }

    let Some(connection) = response
        .data
        .and_then(|data| data.organization)
        .and_then(|organization| organization.repositories)
    else {
        return RepositoryPage::empty();
    };

    RepositoryPage {
        nodes: connection.nodes.into_iter().flatten().collect(),
        page_info: connection.page_info.unwrap_or_default(),
    }
}

/// Kind of a directory listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,

    /// Directory.
    #[serde(alias = "directory")]
    Dir,

    /// Symlink, submodule, or anything else.
    #[serde(other)]
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// File or directory name.
    pub name: String,

    /// Path relative to the repository root.
    pub path: String,

    /// API URL used to fetch the entry's content.
    #[serde(default)]
    pub url: Option<String>,

    /// Browsable URL of the entry.
    #[serde(default)]
    pub html_url: Option<String>,
}

impl TreeEntry {
    /// Returns the URL reported for a match: the browsable URL, or the API URL.
    pub fn browse_url(&self) -> Option<&str> {
        self.html_url.as_deref().or(self.url.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryMetadata {
    size: Option<u64>,
}

/// Reads the `size` field of a repository metadata response.
pub fn parse_repository_size(body: &str) -> Result<Option<u64>, ClientError> {
    let metadata: RepositoryMetadata =
        serde_json::from_str(body).map_err(|e| ClientError::Json {
            context: "repository metadata".to_string(),
            source: e,
        })?;
    Ok(metadata.size)
}

/// Parses a directory listing response.
pub fn parse_directory_listing(body: &str) -> Result<Vec<TreeEntry>, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Json {
        context: "directory listing".to_string(),
        source: e,
    })
}

#[derive(Debug, Deserialize)]
struct BlobContent {
    #[serde(default)]
    content: String,
}

/// Reads and decodes the base64 `content` field of a file response.
pub fn parse_file_content(body: &str) -> Result<String, ClientError> {
    let blob: BlobContent = serde_json::from_str(body).map_err(|e| ClientError::Json {
        context: "file content".to_string(),
        source: e,
    })?;
    decode_content(&blob.content)
}

/// Decodes base64 content as returned by the contents API.
///
/// The API wraps the encoded text at 60 columns, so whitespace is removed
/// before decoding. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_content(encoded: &str) -> Result<String, ClientError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
