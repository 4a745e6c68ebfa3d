use uuid::Uuid;

use super::{Repositories, assemble};
use crate::domain::{AuthorSummary, Comment, CommentView, Principal};
use crate::error::{DomainError, DomainResult};
use crate::validation::{NewComment, Validate};

/// Comment service. Comments are append-only.
#[derive(Clone)]
pub struct CommentService {
    repos: Repositories,
}

impl CommentService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Add a comment by the caller to an existing post.
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        input: NewComment,
    ) -> DomainResult<CommentView> {
        let author = self.repos.caller(principal).await?;
        input.validate()?;

        if self.repos.posts.find_by_id(input.post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", input.post_id));
        }

        let comment = Comment::new(input.post_id, author.id, input.content);
        let comment = self.repos.comments.insert(comment).await?;
        tracing::info!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            author_id = %author.id,
            "Comment created"
        );

        Ok(CommentView {
            comment,
            author: AuthorSummary::contact(&author),
        })
    }

    /// Comments newest first, optionally for a single post.
    pub async fn list(&self, post_id: Option<Uuid>) -> DomainResult<Vec<CommentView>> {
        let comments = self.repos.comments.list(post_id).await?;
        assemble::comment_views(&self.repos, comments, AuthorSummary::contact).await
    }
}
