//! Joins posts and comments with their relations.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::Repositories;
use crate::domain::{
    AuthorSummary, Comment, CommentView, Post, PostListItem, PostView, Tag, User,
};
use crate::error::{DomainError, DomainResult};

/// Author projection used by a read model.
pub(crate) type Projection = fn(&User) -> AuthorSummary;

fn missing_author(id: Uuid) -> DomainError {
    DomainError::Internal(format!("author {id} has no user record"))
}

pub(crate) async fn load_authors(
    repos: &Repositories,
    ids: impl IntoIterator<Item = Uuid>,
) -> DomainResult<HashMap<Uuid, User>> {
    let ids: Vec<Uuid> = ids
        .into_iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = repos.users.find_many(&ids).await?;
    Ok(users.into_iter().map(|user| (user.id, user)).collect())
}

pub(crate) async fn tags_of(repos: &Repositories, post_id: Uuid) -> DomainResult<Vec<Tag>> {
    let mut tags = repos.tags.tags_for_posts(&[post_id]).await?;
    Ok(tags.remove(&post_id).unwrap_or_default())
}

pub(crate) async fn post_view(
    repos: &Repositories,
    post: Post,
    author: &User,
) -> DomainResult<PostView> {
    let tags = tags_of(repos, post.id).await?;
    Ok(PostView {
        post,
        author: AuthorSummary::contact(author),
        tags,
    })
}

pub(crate) async fn list_items(
    repos: &Repositories,
    posts: Vec<Post>,
    project: Projection,
) -> DomainResult<Vec<PostListItem>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let authors = load_authors(repos, posts.iter().map(|p| p.author_id)).await?;
    let mut tags = repos.tags.tags_for_posts(&post_ids).await?;
    let counts = repos.comments.count_by_posts(&post_ids).await?;

    posts
        .into_iter()
        .map(|post| {
            let author = authors
                .get(&post.author_id)
                .ok_or_else(|| missing_author(post.author_id))?;
            Ok(PostListItem {
                author: project(author),
                tags: tags.remove(&post.id).unwrap_or_default(),
                comment_count: counts.get(&post.id).copied().unwrap_or(0),
                post,
            })
        })
        .collect()
}

pub(crate) async fn comment_views(
    repos: &Repositories,
    comments: Vec<Comment>,
    project: Projection,
) -> DomainResult<Vec<CommentView>> {
    let authors = load_authors(repos, comments.iter().map(|c| c.author_id)).await?;
    comments
        .into_iter()
        .map(|comment| {
            let author = authors
                .get(&comment.author_id)
                .ok_or_else(|| missing_author(comment.author_id))?;
            Ok(CommentView {
                author: project(author),
                comment,
            })
        })
        .collect()
}
