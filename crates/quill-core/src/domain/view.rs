//! Read models - posts and comments materialized with their relations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Comment, Post, Tag, User};

/// Author projection attached to posts and comments.
///
/// Which optional fields are filled depends on the view: listings and
/// mutations expose the contact e-mail, public reader views do not, and the
/// reader view of a single post adds the biography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl AuthorSummary {
    /// id, name, email, image.
    pub fn contact(user: &User) -> Self {
        Self {
            email: Some(user.email.clone()),
            ..Self::public(user)
        }
    }

    /// id, name, image.
    pub fn public(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: None,
            image: user.image.clone(),
            bio: None,
        }
    }

    /// id, name, image, bio.
    pub fn profile(user: &User) -> Self {
        Self {
            bio: user.bio.clone(),
            ..Self::public(user)
        }
    }
}

/// A post with its author and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorSummary,
    pub tags: Vec<Tag>,
}

/// A post with author, tags and its comments, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorSummary,
    pub tags: Vec<Tag>,
    pub comments: Vec<CommentView>,
}

/// Listing row: a post with author, tags and the number of comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListItem {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorSummary,
    pub tags: Vec<Tag>,
    pub comment_count: u64,
}

/// A comment with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: AuthorSummary,
}

/// One page of a post listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    pub items: Vec<PostListItem>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// Search results together with the echoed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub posts: Vec<PostListItem>,
    pub query: String,
    pub total: usize,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            query: String::new(),
            total: 0,
        }
    }
}
