use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Uniqueness and foreign-key violations
    /// surface as [`RepoError::Constraint`].
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. [`RepoError::NotFound`] if absent.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Dependent rows cascade.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Fetch every user whose id is in `ids`; unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Sort order for post listings. Every order is descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostOrder {
    #[default]
    Created,
    Published,
    Updated,
}

/// Store-level post filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub author_id: Option<Uuid>,
    pub order: PostOrder,
    pub offset: u64,
    pub limit: Option<u64>,
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Posts matching `query`, ordered and windowed by it.
    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `query`, ignoring its window.
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    /// Published posts whose title, content or excerpt contains `text`
    /// (case-insensitive, literal), most recently published first.
    async fn search(&self, text: &str, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Atomically add one to the view counter.
    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Tag repository, including the post↔tag link table.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Link a tag to a post. Linking twice is a no-op.
    async fn attach(&self, post_id: Uuid, tag_id: Uuid) -> Result<(), RepoError>;

    /// Remove every tag link of a post. Tags themselves survive.
    async fn detach_all(&self, post_id: Uuid) -> Result<(), RepoError>;

    /// Tags of each post, sorted by name. Posts without tags are absent.
    async fn tags_for_posts(&self, post_ids: &[Uuid])
    -> Result<HashMap<Uuid, Vec<Tag>>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments, newest first, optionally restricted to one post.
    async fn list(&self, post_id: Option<Uuid>) -> Result<Vec<Comment>, RepoError>;

    /// Comment count per post. Posts without comments are absent.
    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError>;
}
