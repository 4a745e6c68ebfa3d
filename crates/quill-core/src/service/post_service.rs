//! Post use-case service.
//!
//! # Responsibility
//! - Create, update and delete posts on behalf of their author.
//! - Resolve tag names to shared tag rows and link them to posts.
//! - Serve listings, the author dashboard, featured posts and reader views.
//!
//! # Invariants
//! - `published_at` is stamped once, on the first publish, and never changes.
//! - A post's slug is fixed at creation.
//! - Tag names differing only in case resolve to one tag, and a post
//!   links each resolved tag at most once.
//! - Tag failures are logged and skipped. Post writes and tag writes are not
//!   one transaction.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use super::{Repositories, assemble};
use crate::domain::{
    AuthorSummary, Post, PostDetail, PostListItem, PostPage, PostView, Principal, Tag,
};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{PostOrder, PostQuery};
use crate::validation::{ListPosts, NewPost, PostPatch, Validate, ValidationErrors, non_empty};

/// Number of featured posts returned when the caller does not ask.
pub const DEFAULT_FEATURED_LIMIT: u64 = 3;

/// Post service facade over the repository ports.
#[derive(Clone)]
pub struct PostService {
    repos: Repositories,
}

impl PostService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Create a post authored by the caller.
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        input: NewPost,
    ) -> DomainResult<PostView> {
        let author = self.repos.caller(principal).await?;
        input.validate()?;

        let mut post = Post::new(author.id, input.title, input.content);
        post.excerpt = non_empty(input.excerpt);
        post.cover_image = non_empty(input.cover_image);
        post.set_published(input.published, post.created_at);

        let post = self.repos.posts.insert(post).await?;
        tracing::info!(
            post_id = %post.id,
            slug = %post.slug,
            author_id = %author.id,
            published = post.published,
            "Post created"
        );

        if let Some(names) = &input.tags {
            self.link_tags(post.id, names).await;
        }

        assemble::post_view(&self.repos, post, &author).await
    }

    /// Apply a partial update. Only the author may update a post.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        post_id: Uuid,
        patch: PostPatch,
    ) -> DomainResult<PostView> {
        let author = self.repos.caller(principal).await?;
        let mut post = self.owned_post(post_id, author.id).await?;
        patch.validate()?;

        let now = Utc::now();
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        patch.excerpt.apply(&mut post.excerpt);
        patch.cover_image.apply(&mut post.cover_image);
        if let Some(published) = patch.published {
            post.set_published(published, now);
        }
        post.updated_at = now;

        let post = self.repos.posts.update(post).await?;
        tracing::info!(post_id = %post.id, published = post.published, "Post updated");

        if let Some(names) = &patch.tags {
            self.repos.tags.detach_all(post.id).await?;
            self.link_tags(post.id, names).await;
        }

        assemble::post_view(&self.repos, post, &author).await
    }

    /// Delete a post with its comments and tag links.
    pub async fn delete(&self, principal: Option<&Principal>, post_id: Uuid) -> DomainResult<()> {
        let author = self.repos.caller(principal).await?;
        let post = self.owned_post(post_id, author.id).await?;

        self.repos.posts.delete(post.id).await?;
        tracing::info!(post_id = %post.id, slug = %post.slug, "Post deleted");
        Ok(())
    }

    /// One post with its author, tags and comments.
    pub async fn get(&self, post_id: Uuid) -> DomainResult<PostDetail> {
        let post = self
            .repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;
        self.detail(post, AuthorSummary::contact).await
    }

    /// A page of posts, newest first.
    pub async fn list(&self, params: ListPosts) -> DomainResult<PostPage> {
        params.validate()?;

        let query = PostQuery {
            published: params.published,
            author_id: params.author_id,
            order: PostOrder::Created,
            offset: (params.page - 1).saturating_mul(params.limit),
            limit: Some(params.limit),
            ..Default::default()
        };
        let total = self.repos.posts.count(&query).await?;
        let posts = self.repos.posts.list(&query).await?;
        let items = assemble::list_items(&self.repos, posts, AuthorSummary::contact).await?;

        tracing::debug!(
            page = params.page,
            limit = params.limit,
            total,
            returned = items.len(),
            "Listed posts"
        );

        Ok(PostPage {
            items,
            page: params.page,
            limit: params.limit,
            total,
            total_pages: total.div_ceil(params.limit),
        })
    }

    /// The caller's own posts, drafts included, most recently updated first.
    pub async fn dashboard(
        &self,
        principal: Option<&Principal>,
    ) -> DomainResult<Vec<PostListItem>> {
        let author = self.repos.caller(principal).await?;
        let query = PostQuery {
            author_id: Some(author.id),
            order: PostOrder::Updated,
            ..Default::default()
        };
        let posts = self.repos.posts.list(&query).await?;
        assemble::list_items(&self.repos, posts, AuthorSummary::contact).await
    }

    /// Published featured posts, most recently published first.
    pub async fn featured(&self, limit: u64) -> DomainResult<Vec<PostListItem>> {
        if limit == 0 {
            return Err(ValidationErrors::single("limit", "must be at least 1").into());
        }
        let query = PostQuery {
            published: Some(true),
            featured: Some(true),
            order: PostOrder::Published,
            limit: Some(limit),
            ..Default::default()
        };
        let posts = self.repos.posts.list(&query).await?;
        assemble::list_items(&self.repos, posts, AuthorSummary::public).await
    }

    /// Reader view of a published post. Counts one view.
    pub async fn read_by_slug(&self, slug: &str) -> DomainResult<PostDetail> {
        let mut post = self
            .repos
            .posts
            .find_by_slug(slug)
            .await?
            .filter(|post| post.published)
            .ok_or_else(|| DomainError::not_found("Post", slug))?;

        match self.repos.posts.increment_views(post.id).await {
            Ok(()) => post.views += 1,
            Err(err) => {
                tracing::warn!(post_id = %post.id, error = %err, "Failed to count view");
            }
        }

        self.detail(post, AuthorSummary::profile).await
    }

    async fn owned_post(&self, post_id: Uuid, user_id: Uuid) -> DomainResult<Post> {
        let post = self
            .repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;
        if !post.is_owned_by(user_id) {
            tracing::warn!(post_id = %post_id, user_id = %user_id, "Rejected write by non-author");
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    async fn detail(&self, post: Post, project: assemble::Projection) -> DomainResult<PostDetail> {
        let author = self
            .repos
            .users
            .find_by_id(post.author_id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("author {} missing", post.author_id)))?;
        let tags = assemble::tags_of(&self.repos, post.id).await?;
        let comments = self.repos.comments.list(Some(post.id)).await?;
        let comments =
            assemble::comment_views(&self.repos, comments, AuthorSummary::public).await?;

        Ok(PostDetail {
            author: project(&author),
            post,
            tags,
            comments,
        })
    }

    /// Link each named tag to the post, creating tags as needed.
    async fn link_tags(&self, post_id: Uuid, names: &[String]) {
        let mut linked = HashSet::new();
        for name in names.iter().map(|n| n.trim()) {
            let tag = match self.resolve_tag(name).await {
                Ok(tag) => tag,
                Err(err) => {
                    tracing::warn!(tag = %name, post_id = %post_id, error = %err, "Skipping tag");
                    continue;
                }
            };
            if !linked.insert(tag.id) {
                continue;
            }
            if let Err(err) = self.repos.tags.attach(post_id, tag.id).await {
                tracing::warn!(tag = %name, post_id = %post_id, error = %err, "Failed to link tag");
            }
        }
    }

    /// Find-or-create. A uniqueness conflict means another writer (or a name
    /// differing only in case) owns the row, so it is re-read. A slug owned
    /// by a different name (`"C++"` and `"C#"` both slug to `c-`) stays a
    /// conflict.
    async fn resolve_tag(&self, name: &str) -> DomainResult<Tag> {
        if let Some(tag) = self.repos.tags.find_by_name(name).await? {
            return Ok(tag);
        }

        let candidate = Tag::new(name);
        let slug = candidate.slug.clone();
        match self.repos.tags.insert(candidate).await {
            Ok(tag) => {
                tracing::debug!(tag_id = %tag.id, slug = %tag.slug, "Tag created");
                Ok(tag)
            }
            Err(RepoError::Constraint(reason)) => {
                if let Some(tag) = self.repos.tags.find_by_name(name).await? {
                    return Ok(tag);
                }
                match self.repos.tags.find_by_slug(&slug).await? {
                    Some(tag) if same_tag_name(&tag.name, name) => Ok(tag),
                    Some(tag) => Err(DomainError::Conflict(format!(
                        "tag slug {slug} already belongs to {}",
                        tag.name
                    ))),
                    None => Err(DomainError::Conflict(reason)),
                }
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn same_tag_name(stored: &str, requested: &str) -> bool {
    stored.to_lowercase() == requested.to_lowercase()
}
