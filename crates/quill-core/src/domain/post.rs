use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug;

/// Upper bound on title length, counted in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Post entity - a long-form article owned by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    /// Immutable once the post exists.
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    /// Stamped on the first transition to published, never cleared.
    pub published_at: Option<DateTime<Utc>>,
    pub views: i64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new unpublished post with a slug derived from `title`.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            slug: slug::post_slug(&title),
            title,
            content,
            excerpt: None,
            cover_image: None,
            published: false,
            published_at: None,
            views: 0,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the publication flag. The first time the post goes live,
    /// `published_at` is stamped with `at`; later calls leave it alone.
    pub fn set_published(&mut self, published: bool, at: DateTime<Utc>) {
        if published && self.published_at.is_none() {
            self.published_at = Some(at);
        }
        self.published = published;
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}
