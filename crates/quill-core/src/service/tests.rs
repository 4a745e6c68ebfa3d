//! Service checks that must hold before any repository is consulted.
//! Workflow tests against a real store live in `quill-infra/tests`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::*;
use crate::domain::{Comment, Post, Tag, User};
use crate::error::RepoError;
use crate::ports::{BaseRepository, PostQuery};
use crate::validation::{NewComment, NewPost, PostPatch};

/// Store double that fails every call.
struct Unreachable;

fn refuse<T>() -> Result<T, RepoError> {
    Err(RepoError::Query("store must not be reached".into()))
}

macro_rules! unreachable_base {
    ($entity:ty) => {
        #[async_trait]
        impl BaseRepository<$entity, Uuid> for Unreachable {
            async fn find_by_id(&self, _id: Uuid) -> Result<Option<$entity>, RepoError> {
                refuse()
            }
            async fn insert(&self, _entity: $entity) -> Result<$entity, RepoError> {
                refuse()
            }
            async fn update(&self, _entity: $entity) -> Result<$entity, RepoError> {
                refuse()
            }
            async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
                refuse()
            }
        }
    };
}

unreachable_base!(User);
unreachable_base!(Post);
unreachable_base!(Tag);
unreachable_base!(Comment);

#[async_trait]
impl UserRepository for Unreachable {
    async fn find_many(&self, _ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        refuse()
    }
}

#[async_trait]
impl PostRepository for Unreachable {
    async fn find_by_slug(&self, _slug: &str) -> Result<Option<Post>, RepoError> {
        refuse()
    }
    async fn list(&self, _query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        refuse()
    }
    async fn count(&self, _query: &PostQuery) -> Result<u64, RepoError> {
        refuse()
    }
    async fn search(&self, _text: &str, _limit: u64) -> Result<Vec<Post>, RepoError> {
        refuse()
    }
    async fn increment_views(&self, _id: Uuid) -> Result<(), RepoError> {
        refuse()
    }
}

#[async_trait]
impl TagRepository for Unreachable {
    async fn find_by_name(&self, _name: &str) -> Result<Option<Tag>, RepoError> {
        refuse()
    }
    async fn find_by_slug(&self, _slug: &str) -> Result<Option<Tag>, RepoError> {
        refuse()
    }
    async fn attach(&self, _post_id: Uuid, _tag_id: Uuid) -> Result<(), RepoError> {
        refuse()
    }
    async fn detach_all(&self, _post_id: Uuid) -> Result<(), RepoError> {
        refuse()
    }
    async fn tags_for_posts(
        &self,
        _post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Tag>>, RepoError> {
        refuse()
    }
}

#[async_trait]
impl CommentRepository for Unreachable {
    async fn list(&self, _post_id: Option<Uuid>) -> Result<Vec<Comment>, RepoError> {
        refuse()
    }
    async fn count_by_posts(&self, _post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        refuse()
    }
}

fn repos() -> Repositories {
    let store = Arc::new(Unreachable);
    Repositories {
        users: store.clone(),
        posts: store.clone(),
        tags: store.clone(),
        comments: store,
        provision_callers: false,
    }
}

#[tokio::test]
async fn test_blank_search_skips_store() {
    let search = SearchService::new(repos());

    for query in ["", "   ", "\t\n"] {
        let result = search.search(query, DEFAULT_SEARCH_LIMIT).await.unwrap();
        assert_eq!(result, crate::domain::SearchResult::empty());
    }
}

#[tokio::test]
async fn test_search_rejects_zero_limit() {
    let search = SearchService::new(repos());
    let err = search.search("rust", 0).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_anonymous_writes_rejected_before_store() {
    let posts = PostService::new(repos());
    let comments = CommentService::new(repos());

    let input = NewPost {
        title: "Title".to_string(),
        content: "Body".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        posts.create(None, input).await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        posts
            .update(None, Uuid::new_v4(), PostPatch::default())
            .await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        posts.delete(None, Uuid::new_v4()).await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        posts.dashboard(None).await,
        Err(DomainError::Unauthenticated)
    ));

    let comment = NewComment {
        post_id: Uuid::new_v4(),
        content: "Nice".to_string(),
    };
    assert!(matches!(
        comments.create(None, comment).await,
        Err(DomainError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_featured_rejects_zero_limit() {
    let posts = PostService::new(repos());
    assert!(matches!(
        posts.featured(0).await,
        Err(DomainError::Validation(_))
    ));
}
