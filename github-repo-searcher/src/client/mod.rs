//! GitHub API access.
//!
//! [`GitHubApi`] is the seam between the scan logic and the network. The
//! production implementation, [`OctocrabClient`], lists repositories through
//! the GraphQL endpoint and walks contents through the REST API. Apart from
//! the repository listing, every operation degrades failures to "no data"
//! and logs a diagnostic instead of returning an error.

mod error;
#[cfg(test)]
pub(crate) mod fake;
mod types;

pub use error::ClientError;
pub use types::{
    decode_content, parse_directory_listing, parse_file_content, parse_repository_page,
    parse_repository_size, EntryKind, PageInfo, RepositoryPage, RepositorySummary, TreeEntry,
    REPOSITORIES_QUERY,
};

use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

/// Operations the scanner needs from the hosting platform.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetches one page of up to 100 repositories of `org`, starting after `cursor`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] only on transport failure. Malformed or
    /// error-bearing responses yield [`RepositoryPage::empty`].
    async fn list_repositories(
        &self,
        org: &str,
        cursor: Option<&str>,
    ) -> Result<RepositoryPage, ClientError>;

    /// Returns the repository size in kilobytes, or `None` if it could not be fetched.
    async fn repository_size(&self, org: &str, repo: &str) -> Option<u64>;

    /// Lists one directory. Missing directories and failures yield an empty listing.
    async fn list_directory(&self, org: &str, repo: &str, path: &str) -> Vec<TreeEntry>;

    /// Fetches and decodes a file's content from its API URL.
    async fn file_content(&self, content_url: &str) -> Option<String>;
}

/// Derives the GraphQL endpoint from a REST API base URL.
///
/// `https://api.github.com` becomes `https://api.github.com/graphql` and
/// `https://ghe.example.com/api/v3` becomes `https://ghe.example.com/api/graphql`.
pub fn graphql_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = base.strip_suffix("/v3").unwrap_or(base);
    format!("{base}/graphql")
}

/// [`GitHubApi`] backed by an authenticated [`Octocrab`] instance.
#[derive(Clone)]
pub struct OctocrabClient {
    octocrab: Octocrab,
    api_root: Url,
    graphql_url: Url,
}

impl OctocrabClient {
    /// Builds a client for the REST API at `base_url`, authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BaseUrl`] if `base_url` is not an absolute
    /// http(s) URL, or [`ClientError::Http`] if the client cannot be constructed.
    pub fn new(base_url: &str, token: &str) -> Result<Self, ClientError> {
        let invalid = || ClientError::BaseUrl(base_url.to_string());
        let api_root = Url::parse(base_url.trim_end_matches('/')).map_err(|_| invalid())?;
        if api_root.cannot_be_a_base() || !api_root.origin().is_tuple() {
            return Err(invalid());
        }
        let graphql_url = Url::parse(&graphql_endpoint(api_root.as_str())).map_err(|_| invalid())?;

        // octocrab prefixes relative paths with the base path, so it only gets
        // the origin and every request carries its full path (`/api/v3/...`).
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_root.origin().ascii_serialization())?
            .build()?;
        Ok(Self {
            octocrab,
            api_root,
            graphql_url,
        })
    }

    /// Returns the GraphQL endpoint this client posts to.
    pub fn graphql_url(&self) -> &str {
        self.graphql_url.as_str()
    }

    /// Appends percent-encoded `segments` to the REST API root.
    fn endpoint<'s>(
        &self,
        segments: impl IntoIterator<Item = &'s str>,
    ) -> Result<Url, ClientError> {
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::BaseUrl(self.api_root.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues a GET below the REST API root.
    async fn get_path<'s>(
        &self,
        segments: impl IntoIterator<Item = &'s str>,
    ) -> Result<(u16, String), ClientError> {
        let url = self.endpoint(segments)?;
        self.get(url.as_str()).await
    }

    /// Issues a GET and returns the status code with the body text.
    async fn get(&self, url: &str) -> Result<(u16, String), ClientError> {
        let response = self.octocrab._get(url).await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;
        Ok((status, body))
    }
}

#[async_trait]
impl GitHubApi for OctocrabClient {
    async fn list_repositories(
        &self,
        org: &str,
        cursor: Option<&str>,
    ) -> Result<RepositoryPage, ClientError> {
        let payload = json!({
            "query": REPOSITORIES_QUERY,
            "variables": { "org": org, "cursor": cursor },
        });
        debug!(org, cursor = ?cursor, "Fetching repository page");

        let response = self
            .octocrab
            ._post(self.graphql_url(), Some(&payload))
            .await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;
        if status != 200 {
            warn!(org, status, "Repository listing returned a non-success status");
        }

        Ok(parse_repository_page(org, &body))
    }

    async fn repository_size(&self, org: &str, repo: &str) -> Option<u64> {
        match self.get_path(["repos", org, repo]).await {
            Ok((200, body)) => match parse_repository_size(&body) {
                Ok(size) => size,
                Err(e) => {
                    warn!(org, repo, error = %e, "Failed to fetch repository size information");
                    None
                }
            },
            Ok((status, _)) => {
                warn!(org, repo, status, "Failed to fetch repository size information");
                None
            }
            Err(e) => {
                warn!(org, repo, error = %e, "Failed to fetch repository size information");
                None
            }
        }
    }

    async fn list_directory(&self, org: &str, repo: &str, path: &str) -> Vec<TreeEntry> {
        let segments = ["repos", org, repo, "contents"]
            .into_iter()
            .chain(path.split('/').filter(|part| !part.is_empty()));
        match self.get_path(segments).await {
            Ok((200, body)) => parse_directory_listing(&body).unwrap_or_else(|e| {
                warn!(org, repo, path, error = %e, "Failed to access directory");
                Vec::new()
            }),
            Ok((404, _)) => {
                debug!(org, repo, path, "Directory does not exist");
                Vec::new()
            }
            Ok((status, _)) => {
                warn!(org, repo, path, status, "Failed to access directory");
                Vec::new()
            }
            Err(e) => {
                warn!(org, repo, path, error = %e, "Failed to access directory");
                Vec::new()
            }
        }
    }

    async fn file_content(&self, content_url: &str) -> Option<String> {
        match self.get(content_url).await {
            Ok((200, body)) => parse_file_content(&body)
                .map_err(|e| warn!(url = content_url, error = %e, "Failed to read file content"))
                .ok(),
            Ok((status, _)) => {
                debug!(url = content_url, status, "File content unavailable");
                None
            }
            Err(e) => {
                warn!(url = content_url, error = %e, "Failed to fetch file content");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_endpoint_for_public_api() {
        assert_eq!(
            graphql_endpoint("https://api.github.com"),
            "https://api.github.com/graphql"
        );
        assert_eq!(
            graphql_endpoint("https://api.github.com/"),
            "https://api.github.com/graphql"
        );
    }

    #[test]
    fn graphql_endpoint_strips_version_segment() {
        assert_eq!(
            graphql_endpoint("https://ghe.example.com/api/v3"),
            "https://ghe.example.com/api/graphql"
        );
        assert_eq!(
            graphql_endpoint("https://ghe.example.com/api/v3/"),
            "https://ghe.example.com/api/graphql"
        );
    }

    mod http {
        use super::*;
        use std::sync::{Arc, Mutex};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::{TcpListener, TcpStream};

        /// One request as seen on the wire.
        #[derive(Debug, Clone)]
        struct Request {
            /// Method and target, e.g. `GET /repos/acme/infra`.
            line: String,
            head: String,
        }

        /// HTTP/1.1 server answering from a fixed route table; unknown routes get a 404.
        struct Server {
            base: String,
            requests: Arc<Mutex<Vec<Request>>>,
        }

        impl Server {
            async fn start(routes: Vec<(&'static str, u16, &'static str)>) -> Self {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                let base = format!("http://{}", listener.local_addr().unwrap());
                let requests = Arc::new(Mutex::new(Vec::new()));
                let seen = Arc::clone(&requests);

                tokio::spawn(async move {
                    while let Ok((mut socket, _)) = listener.accept().await {
                        let head = read_head(&mut socket).await;
                        let line = head
                            .lines()
                            .next()
                            .unwrap_or_default()
                            .trim_end_matches(" HTTP/1.1")
                            .to_string();
                        let (status, body) = routes
                            .iter()
                            .find(|(route, _, _)| *route == line)
                            .map(|(_, status, body)| (*status, *body))
                            .unwrap_or((404, r#"{"message":"Not Found"}"#));
                        seen.lock().unwrap().push(Request { line, head });

                        let response = format!(
                            "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                            body.len()
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                });

                Self { base, requests }
            }

            fn lines(&self) -> Vec<String> {
                self.requests
                    .lock()
                    .unwrap()
                    .iter()
                    .map(|request| request.line.clone())
                    .collect()
            }

            fn heads(&self) -> Vec<String> {
                self.requests
                    .lock()
                    .unwrap()
                    .iter()
                    .map(|request| request.head.clone())
                    .collect()
            }
        }

        /// Reads the request head and drains the body announced by `content-length`.
        async fn read_head(socket: &mut TcpStream) -> String {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let end = loop {
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos;
                }
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    return String::new();
                }
                buf.extend_from_slice(&chunk[..n]);
            };

            let head = String::from_utf8_lossy(&buf[..end]).into_owned();
            let length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let mut read = buf.len() - (end + 4);
            while read < length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                read += n;
            }
            head
        }

        fn client(base_url: &str) -> OctocrabClient {
            let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
            OctocrabClient::new(base_url, "t0ken").unwrap()
        }

        const PAGE: &str = r#"{"data":{"organization":{"repositories":{"pageInfo":{"hasNextPage":false,"endCursor":null},"nodes":[{"id":"R_1","name":"infra"}]}}}}"#;

        #[tokio::test]
        async fn enterprise_requests_keep_the_api_prefix() {
            let server = Server::start(vec![
                ("POST /api/graphql", 200, PAGE),
                ("GET /api/v3/repos/acme/infra", 200, r#"{"id":1,"size":7}"#),
            ])
            .await;
            let client = client(&format!("{}/api/v3", server.base));
            assert_eq!(client.graphql_url(), format!("{}/api/graphql", server.base));

            let page = client.list_repositories("acme", None).await.unwrap();
            let size = client.repository_size("acme", "infra").await;

            assert_eq!(page.nodes[0].name, "infra");
            assert_eq!(size, Some(7));
            assert_eq!(
                server.lines(),
                ["POST /api/graphql", "GET /api/v3/repos/acme/infra"]
            );
            assert!(server.heads().iter().all(|head| head.contains("t0ken")));
        }

        #[tokio::test]
        async fn public_api_paths_start_at_the_root() {
            let server = Server::start(vec![("POST /graphql", 200, PAGE)]).await;
            let client = client(&server.base);

            let page = client.list_repositories("acme", Some("c1")).await.unwrap();

            assert_eq!(page.nodes.len(), 1);
            assert_eq!(server.lines(), ["POST /graphql"]);
        }

        #[tokio::test]
        async fn directory_paths_are_percent_encoded() {
            let listing = r#"[{"type":"file","name":"bug.yml","path":".github/ISSUE TEMPLATE/bug.yml","url":"u","html_url":"h"}]"#;
            let server = Server::start(vec![(
                "GET /api/v3/repos/acme/infra/contents/.github/ISSUE%20TEMPLATE",
                200,
                listing,
            )])
            .await;
            let client = client(&format!("{}/api/v3/", server.base));

            let entries = client
                .list_directory("acme", "infra", ".github/ISSUE TEMPLATE")
                .await;

            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].name, "bug.yml");
            assert_eq!(
                server.lines(),
                ["GET /api/v3/repos/acme/infra/contents/.github/ISSUE%20TEMPLATE"]
            );
        }

        #[tokio::test]
        async fn failed_listings_and_fetches_yield_no_data() {
            let server = Server::start(vec![
                ("GET /repos/acme/locked/contents/.github", 403, r#"{"message":"Forbidden"}"#),
                ("GET /repos/acme/odd/contents/.github", 200, "not json"),
                ("GET /repos/acme/locked", 403, r#"{"message":"Forbidden"}"#),
                (
                    "GET /blob/ci.yml",
                    200,
                    r#"{"content":"dXNlczogYWN0aW9ucy91cGxv\nYWQtYXJ0aWZhY3RAdjM=\n","encoding":"base64"}"#,
                ),
            ])
            .await;
            let client = client(&server.base);

            assert!(client.list_directory("acme", "docs", ".github").await.is_empty());
            assert!(client.list_directory("acme", "locked", ".github").await.is_empty());
            assert!(client.list_directory("acme", "odd", ".github").await.is_empty());
            assert_eq!(client.repository_size("acme", "locked").await, None);
            assert_eq!(
                client
                    .file_content(&format!("{}/blob/ci.yml", server.base))
                    .await
                    .as_deref(),
                Some("uses: actions/upload-artifact@v3")
            );
            assert_eq!(
                client
                    .file_content(&format!("{}/blob/gone.yml", server.base))
                    .await,
                None
            );
            assert_eq!(
                server.lines(),
                [
                    "GET /repos/acme/docs/contents/.github",
                    "GET /repos/acme/locked/contents/.github",
                    "GET /repos/acme/odd/contents/.github",
                    "GET /repos/acme/locked",
                    "GET /blob/ci.yml",
                    "GET /blob/gone.yml",
                ]
            );
        }

        #[test]
        fn rejects_base_urls_without_a_host() {
            assert!(matches!(
                OctocrabClient::new("mailto:ops@example.com", "t0ken"),
                Err(ClientError::BaseUrl(_))
            ));
        }
    }
}
