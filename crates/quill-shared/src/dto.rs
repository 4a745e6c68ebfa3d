//! Data Transfer Objects - query strings and response bodies of the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string of `GET /api/posts`.
///
/// `published` stays textual: only the exact value `true` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub published: Option<String>,
    pub author_id: Option<Uuid>,
}

impl ListPostsParams {
    pub fn published_only(&self) -> bool {
        self.published.as_deref() == Some("true")
    }
}

/// Query string of `GET /api/posts/featured`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturedParams {
    pub limit: Option<u64>,
}

/// Query string of `GET /api/comments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsParams {
    pub post_id: Option<Uuid>,
}

/// Query string of `GET /api/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<u64>,
}

/// Pagination block of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// Paginated post listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse<T> {
    pub posts: Vec<T>,
    pub pagination: Pagination,
}

/// Unpaginated post collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCollection<T> {
    pub posts: Vec<T>,
}
