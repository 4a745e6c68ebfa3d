use super::{Repositories, assemble};
use crate::domain::{AuthorSummary, SearchResult};
use crate::error::DomainResult;
use crate::validation::ValidationErrors;

/// Number of search results returned when the caller does not ask.
pub const DEFAULT_SEARCH_LIMIT: u64 = 10;

/// Full-text-ish search over published posts.
#[derive(Clone)]
pub struct SearchService {
    repos: Repositories,
}

impl SearchService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Case-insensitive substring search over title, content and excerpt.
    ///
    /// A blank query short-circuits to an empty result without touching the
    /// store. Otherwise the raw query (surrounding whitespace included) is
    /// matched and echoed back.
    pub async fn search(&self, query: &str, limit: u64) -> DomainResult<SearchResult> {
        if query.trim().is_empty() {
            return Ok(SearchResult::empty());
        }
        if limit == 0 {
            return Err(ValidationErrors::single("limit", "must be at least 1").into());
        }

        let posts = self.repos.posts.search(query, limit).await?;
        let posts = assemble::list_items(&self.repos, posts, AuthorSummary::public).await?;
        tracing::debug!(query = %query, hits = posts.len(), "Search completed");

        Ok(SearchResult {
            total: posts.len(),
            posts,
            query: query.to_string(),
        })
    }
}
