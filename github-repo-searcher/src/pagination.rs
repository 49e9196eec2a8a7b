//! Cursor-driven pagination over an organization's repositories.

use futures::stream::{self, Stream};
use tracing::debug;

use crate::client::{ClientError, GitHubApi, RepositorySummary};

/// Position of a [`RepositoryPages`] sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PaginatorState {
    /// Another page can be requested after `cursor` (`None` for the first page).
    HasMore { cursor: Option<String> },

    /// The last page has been returned.
    Done,
}

/// Forward-only, lazy sequence of repository batches for one organization.
///
/// Each call to [`next_page`](Self::next_page) issues one listing query.
/// The sequence ends once the backend reports no further page; a backend
/// that keeps reporting more pages with the same cursor never ends.
pub struct RepositoryPages<'a, A: GitHubApi + ?Sized> {
    api: &'a A,
    org: &'a str,
    state: PaginatorState,
    fetches: usize,
}

impl<'a, A: GitHubApi + ?Sized> RepositoryPages<'a, A> {
    /// Starts paging from the first repository of `org`.
    pub fn new(api: &'a A, org: &'a str) -> Self {
        Self {
            api,
            org,
            state: PaginatorState::HasMore { cursor: None },
            fetches: 0,
        }
    }

    /// Fetches the next batch, or `None` once all pages have been returned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the listing query fails. The sequence is
    /// finished afterwards.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RepositorySummary>>, ClientError> {
        let cursor = match std::mem::replace(&mut self.state, PaginatorState::Done) {
            PaginatorState::HasMore { cursor } => cursor,
            PaginatorState::Done => return Ok(None),
        };

        self.fetches += 1;
        let page = self
            .api
            .list_repositories(self.org, cursor.as_deref())
            .await?;
        debug!(
            org = self.org,
            count = page.nodes.len(),
            has_next_page = page.page_info.has_next_page,
            "Fetched repository page"
        );

        if page.page_info.has_next_page {
            self.state = PaginatorState::HasMore {
                cursor: page.page_info.end_cursor,
            };
        }
        Ok(Some(page.nodes))
    }

    /// Number of listing queries issued so far.
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    /// Converts the sequence into a stream of batches.
    ///
    /// The stream ends after the last page, or after yielding the first error.
    pub fn into_stream(
        self,
    ) -> impl Stream<Item = Result<Vec<RepositorySummary>, ClientError>> + 'a {
        stream::unfold(self, |mut pages| async move {
            match pages.next_page().await {
                Ok(Some(batch)) => Some((Ok(batch), pages)),
                Ok(None) => None,
                Err(e) => Some((Err(e), pages)),
            }
        })
    }
}
