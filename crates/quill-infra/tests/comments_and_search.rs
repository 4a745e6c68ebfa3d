mod common;

use common::{Harness, new_post, tags};
use quill_core::DomainError;
use quill_core::service::DEFAULT_SEARCH_LIMIT;
use quill_core::validation::NewComment;
use uuid::Uuid;

fn comment(post_id: Uuid, content: &str) -> NewComment {
    NewComment {
        post_id,
        content: content.to_string(),
    }
}

#[tokio::test]
async fn test_comments_attach_to_existing_posts_only() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let bob = h.user("bob@example.com", "Bob").await;
    let post = h
        .posts
        .create(Some(&ada), new_post("Open", "Body"))
        .await
        .unwrap();

    let view = h
        .comments
        .create(Some(&bob), comment(post.post.id, "Great read"))
        .await
        .unwrap();
    assert_eq!(view.comment.author_id, bob.id);
    assert_eq!(view.author.email.as_deref(), Some("bob@example.com"));

    let err = h
        .comments
        .create(Some(&bob), comment(Uuid::new_v4(), "Lost"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = h
        .comments
        .create(Some(&bob), comment(post.post.id, ""))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_comments_list_newest_first_and_filters_by_post() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let one = h
        .posts
        .create(Some(&ada), new_post("One", "Body"))
        .await
        .unwrap();
    let two = h
        .posts
        .create(Some(&ada), new_post("Two", "Body"))
        .await
        .unwrap();

    for (post_id, text) in [(one.post.id, "first"), (one.post.id, "second"), (two.post.id, "other")] {
        h.comments
            .create(Some(&ada), comment(post_id, text))
            .await
            .unwrap();
    }

    let all = h.comments.list(None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].comment.content, "other");

    let on_one = h.comments.list(Some(one.post.id)).await.unwrap();
    let texts: Vec<&str> = on_one.iter().map(|c| c.comment.content.as_str()).collect();
    assert_eq!(texts, vec!["second", "first"]);

    let detail = h.posts.get(one.post.id).await.unwrap();
    assert_eq!(detail.comments.len(), 2);
    assert!(detail.comments[0].author.email.is_none());

    let page = h.posts.list(Default::default()).await.unwrap();
    let counted = page
        .items
        .iter()
        .find(|i| i.post.id == one.post.id)
        .unwrap();
    assert_eq!(counted.comment_count, 2);
}

#[tokio::test]
async fn test_search_matches_published_posts_case_insensitively() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;

    let mut by_title = new_post("Learning RUST", "Body");
    by_title.published = true;
    by_title.tags = tags(&["rust"]);
    let mut by_excerpt = new_post("Elsewhere", "Body");
    by_excerpt.excerpt = Some("a rusty bike".to_string());
    by_excerpt.published = true;
    let mut draft = new_post("Rust draft", "Body");
    draft.published = false;

    let title_hit = h.posts.create(Some(&ada), by_title).await.unwrap();
    let excerpt_hit = h.posts.create(Some(&ada), by_excerpt).await.unwrap();
    h.posts.create(Some(&ada), draft).await.unwrap();

    let result = h.search.search("rust", DEFAULT_SEARCH_LIMIT).await.unwrap();
    assert_eq!(result.query, "rust");
    assert_eq!(result.total, 2);
    let ids: Vec<Uuid> = result.posts.iter().map(|i| i.post.id).collect();
    assert_eq!(ids, vec![excerpt_hit.post.id, title_hit.post.id]);
    assert_eq!(result.posts[1].tags[0].name, "rust");
    assert!(result.posts[0].author.email.is_none());

    let limited = h.search.search("RUST", 1).await.unwrap();
    assert_eq!(limited.total, 1);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let mut input = new_post("Discount", "Now 50% off");
    input.published = true;
    h.posts.create(Some(&ada), input).await.unwrap();

    assert_eq!(h.search.search("50%", 10).await.unwrap().total, 1);
    assert_eq!(h.search.search("5_%", 10).await.unwrap().total, 0);
    assert_eq!(h.search.search("%", 10).await.unwrap().total, 1);
}

#[tokio::test]
async fn test_blank_search_returns_empty_result() {
    let h = Harness::new();
    let result = h.search.search("   ", 10).await.unwrap();
    assert!(result.posts.is_empty());
    assert_eq!(result.query, "");
    assert_eq!(result.total, 0);
}
