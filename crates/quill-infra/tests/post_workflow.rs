mod common;

use common::{Harness, new_post, tags};
use quill_core::DomainError;
use quill_core::domain::Principal;
use quill_core::validation::{ListPosts, Patch, PostPatch};
use quill_infra::InMemoryStore;

#[tokio::test]
async fn test_create_derives_unique_slugs_and_draft_state() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;

    let first = h
        .posts
        .create(Some(&ada), new_post("Hello, World!", "Body"))
        .await
        .unwrap();
    let second = h
        .posts
        .create(Some(&ada), new_post("Hello, World!", "Body"))
        .await
        .unwrap();

    assert!(first.post.slug.starts_with("hello-world-"));
    assert_ne!(first.post.slug, second.post.slug);
    assert!(!first.post.published);
    assert!(first.post.published_at.is_none());
    assert_eq!(first.author.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn test_create_published_stamps_published_at() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;

    let mut input = new_post("Live", "Body");
    input.published = true;
    input.excerpt = Some(String::new());
    let view = h.posts.create(Some(&ada), input).await.unwrap();

    assert!(view.post.published);
    assert_eq!(view.post.published_at, Some(view.post.created_at));
    assert!(view.post.excerpt.is_none());
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;

    let err = h
        .posts
        .create(Some(&ada), new_post(&"x".repeat(201), "Body"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let page = h.posts.list(ListPosts::default()).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_principal_without_user_record_is_unauthenticated() {
    let h = Harness::new();
    let ghost = Principal {
        id: uuid::Uuid::new_v4(),
        name: "Ghost".to_string(),
        email: "ghost@example.com".to_string(),
        image: None,
    };

    let err = h
        .posts
        .create(Some(&ghost), new_post("Boo", "Body"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated));
}

#[tokio::test]
async fn test_publish_transition_stamps_once() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let draft = h
        .posts
        .create(Some(&ada), new_post("Draft", "Body"))
        .await
        .unwrap();

    let publish = PostPatch {
        published: Some(true),
        ..Default::default()
    };
    let live = h
        .posts
        .update(Some(&ada), draft.post.id, publish.clone())
        .await
        .unwrap();
    let stamped = live.post.published_at.unwrap();
    assert!(stamped >= live.post.created_at);

    let again = h
        .posts
        .update(Some(&ada), draft.post.id, publish.clone())
        .await
        .unwrap();
    assert_eq!(again.post.published_at, Some(stamped));

    let unpublish = PostPatch {
        published: Some(false),
        ..Default::default()
    };
    h.posts
        .update(Some(&ada), draft.post.id, unpublish)
        .await
        .unwrap();
    let republished = h
        .posts
        .update(Some(&ada), draft.post.id, publish)
        .await
        .unwrap();
    assert_eq!(republished.post.published_at, Some(stamped));
}

#[tokio::test]
async fn test_empty_update_only_touches_updated_at() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let mut input = new_post("Stable", "Body");
    input.excerpt = Some("Short".to_string());
    input.tags = tags(&["rust"]);
    let before = h.posts.create(Some(&ada), input).await.unwrap();

    let after = h
        .posts
        .update(Some(&ada), before.post.id, PostPatch::default())
        .await
        .unwrap();

    assert!(after.post.updated_at >= before.post.updated_at);
    let mut expected = before.post.clone();
    expected.updated_at = after.post.updated_at;
    assert_eq!(after.post, expected);
    assert_eq!(after.tags, before.tags);
}

#[tokio::test]
async fn test_update_changes_title_but_never_slug() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let mut input = new_post("Original", "Body");
    input.cover_image = Some("cover.png".to_string());
    let created = h.posts.create(Some(&ada), input).await.unwrap();

    let patch = PostPatch {
        title: Some("Renamed".to_string()),
        cover_image: Patch::Clear,
        ..Default::default()
    };
    let updated = h
        .posts
        .update(Some(&ada), created.post.id, patch)
        .await
        .unwrap();

    assert_eq!(updated.post.title, "Renamed");
    assert_eq!(updated.post.slug, created.post.slug);
    assert!(updated.post.cover_image.is_none());
}

#[tokio::test]
async fn test_shared_tag_is_stored_once() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;

    let mut first = new_post("One", "Body");
    first.tags = tags(&["rust"]);
    let mut second = new_post("Two", "Body");
    second.tags = tags(&["rust", "web"]);
    let one = h.posts.create(Some(&ada), first).await.unwrap();
    let two = h.posts.create(Some(&ada), second).await.unwrap();

    assert_eq!(one.tags.len(), 1);
    assert_eq!(two.tags.len(), 2);
    assert_eq!(one.tags[0].id, two.tags[0].id);
    assert_eq!(two.tags[1].slug, "web");
}

#[tokio::test]
async fn test_case_variants_resolve_to_one_tag() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;

    let mut input = new_post("Cased", "Body");
    input.tags = tags(&["A", "a", " A "]);
    let view = h.posts.create(Some(&ada), input).await.unwrap();

    assert_eq!(view.tags.len(), 1);
    assert_eq!(view.tags[0].name, "A");
    assert_eq!(view.tags[0].slug, "a");
    assert!(h.repos.tags.find_by_name("a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_names_sharing_a_slug_stay_distinct() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;

    let mut first = new_post("Pointers", "Body");
    first.tags = tags(&["C++"]);
    let mut second = new_post("Delegates", "Body");
    second.tags = tags(&["C#", "dotnet"]);
    let cpp = h.posts.create(Some(&ada), first).await.unwrap();
    let csharp = h.posts.create(Some(&ada), second).await.unwrap();

    assert_eq!(cpp.tags[0].name, "C++");
    let names: Vec<&str> = csharp.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["dotnet"]);
    assert!(h.repos.tags.find_by_name("C#").await.unwrap().is_none());

    let detail = h.posts.get(cpp.post.id).await.unwrap();
    assert_eq!(detail.tags.len(), 1);
}

#[tokio::test]
async fn test_replacing_tags_relinks() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let mut input = new_post("Tagged", "Body");
    input.tags = tags(&["rust", "web"]);
    let created = h.posts.create(Some(&ada), input).await.unwrap();

    let patch = PostPatch {
        tags: tags(&["async"]),
        ..Default::default()
    };
    let updated = h
        .posts
        .update(Some(&ada), created.post.id, patch)
        .await
        .unwrap();

    let names: Vec<&str> = updated.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["async"]);
    assert!(h.repos.tags.find_by_name("web").await.unwrap().is_some());

    let cleared = h
        .posts
        .update(
            Some(&ada),
            created.post.id,
            PostPatch {
                tags: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.tags.is_empty());
}

#[tokio::test]
async fn test_non_author_cannot_modify() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let bob = h.user("bob@example.com", "Bob").await;
    let created = h
        .posts
        .create(Some(&ada), new_post("Mine", "Body"))
        .await
        .unwrap();

    let patch = PostPatch {
        title: Some("Stolen".to_string()),
        ..Default::default()
    };
    let err = h
        .posts
        .update(Some(&bob), created.post.id, patch)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let err = h
        .posts
        .delete(Some(&bob), created.post.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let unchanged = h.posts.get(created.post.id).await.unwrap();
    assert_eq!(unchanged.post, created.post);
}

#[tokio::test]
async fn test_ownership_checked_before_validation() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let bob = h.user("bob@example.com", "Bob").await;
    let created = h
        .posts
        .create(Some(&ada), new_post("Mine", "Body"))
        .await
        .unwrap();

    let invalid = PostPatch {
        title: Some(String::new()),
        ..Default::default()
    };
    let err = h
        .posts
        .update(Some(&bob), created.post.id, invalid)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let err = h
        .posts
        .update(Some(&ada), uuid::Uuid::new_v4(), PostPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_cascades_comments_and_keeps_tags() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let mut input = new_post("Doomed", "Body");
    input.tags = tags(&["rust"]);
    let created = h.posts.create(Some(&ada), input).await.unwrap();
    h.comments
        .create(
            Some(&ada),
            quill_core::validation::NewComment {
                post_id: created.post.id,
                content: "First".to_string(),
            },
        )
        .await
        .unwrap();

    h.posts.delete(Some(&ada), created.post.id).await.unwrap();

    assert!(matches!(
        h.posts.get(created.post.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(
        h.comments
            .list(Some(created.post.id))
            .await
            .unwrap()
            .is_empty()
    );
    assert!(h.repos.tags.find_by_name("rust").await.unwrap().is_some());
}

#[tokio::test]
async fn test_list_paginates_newest_first() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    for i in 0..5 {
        let mut input = new_post(&format!("Post {i}"), "Body");
        input.published = i % 2 == 0;
        h.posts.create(Some(&ada), input).await.unwrap();
    }

    let page = h
        .posts
        .list(ListPosts {
            page: 2,
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].post.title, "Post 2");

    let published = h
        .posts
        .list(ListPosts {
            published: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(published.total, 3);
    assert!(published.items.iter().all(|i| i.post.published));

    let beyond = h
        .posts
        .list(ListPosts {
            page: 9,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 5);
}

#[tokio::test]
async fn test_dashboard_lists_own_posts_by_update() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let bob = h.user("bob@example.com", "Bob").await;
    let older = h
        .posts
        .create(Some(&ada), new_post("Older", "Body"))
        .await
        .unwrap();
    h.posts
        .create(Some(&ada), new_post("Newer", "Body"))
        .await
        .unwrap();
    h.posts
        .create(Some(&bob), new_post("Bob's", "Body"))
        .await
        .unwrap();

    h.posts
        .update(
            Some(&ada),
            older.post.id,
            PostPatch {
                content: Some("Edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mine = h.posts.dashboard(Some(&ada)).await.unwrap();
    let titles: Vec<&str> = mine.iter().map(|i| i.post.title.as_str()).collect();
    assert_eq!(titles, vec!["Older", "Newer"]);
}

#[tokio::test]
async fn test_read_by_slug_counts_views_and_hides_drafts() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let mut input = new_post("Read Me", "Body");
    input.published = true;
    let live = h.posts.create(Some(&ada), input).await.unwrap();
    let draft = h
        .posts
        .create(Some(&ada), new_post("Hidden", "Body"))
        .await
        .unwrap();

    let first = h.posts.read_by_slug(&live.post.slug).await.unwrap();
    let second = h.posts.read_by_slug(&live.post.slug).await.unwrap();
    assert_eq!(first.post.views, 1);
    assert_eq!(second.post.views, 2);
    assert_eq!(second.author.bio.as_deref(), Some("Writes things."));
    assert!(second.author.email.is_none());

    assert!(matches!(
        h.posts.read_by_slug(&draft.post.slug).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_update_keeps_views_counted_in_between() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    let mut input = new_post("Popular", "Body");
    input.published = true;
    let created = h.posts.create(Some(&ada), input).await.unwrap();

    let mut snapshot = h
        .repos
        .posts
        .find_by_id(created.post.id)
        .await
        .unwrap()
        .unwrap();
    h.posts.read_by_slug(&created.post.slug).await.unwrap();
    h.posts.read_by_slug(&created.post.slug).await.unwrap();

    snapshot.title = "Still Popular".to_string();
    let written = h.repos.posts.update(snapshot).await.unwrap();
    assert_eq!(written.views, 2);

    let patch = PostPatch {
        content: Some("Edited".to_string()),
        ..Default::default()
    };
    let updated = h
        .posts
        .update(Some(&ada), created.post.id, patch)
        .await
        .unwrap();
    assert_eq!(updated.post.views, 2);
    assert_eq!(h.posts.get(created.post.id).await.unwrap().post.views, 2);
}

#[tokio::test]
async fn test_provisioned_callers_get_a_user_row() {
    let h = Harness::from_repos(InMemoryStore::new().repositories().with_caller_provisioning());
    let newcomer = Principal {
        id: uuid::Uuid::new_v4(),
        name: "Newcomer".to_string(),
        email: "new@example.com".to_string(),
        image: Some("new.png".to_string()),
    };

    let view = h
        .posts
        .create(Some(&newcomer), new_post("First", "Body"))
        .await
        .unwrap();
    assert_eq!(view.post.author_id, newcomer.id);
    assert_eq!(view.author.email.as_deref(), Some("new@example.com"));
    assert_eq!(view.author.image.as_deref(), Some("new.png"));

    h.posts
        .create(Some(&newcomer), new_post("Second", "Body"))
        .await
        .unwrap();
    assert_eq!(h.posts.dashboard(Some(&newcomer)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_featured_returns_published_featured_posts() {
    let h = Harness::new();
    let ada = h.user("ada@example.com", "Ada").await;
    for (title, published) in [("A", true), ("B", true), ("C", false)] {
        let mut input = new_post(title, "Body");
        input.published = published;
        let view = h.posts.create(Some(&ada), input).await.unwrap();

        // Featuring is an editorial flag outside the author workflow.
        let mut post = view.post;
        post.featured = true;
        h.repos.posts.update(post).await.unwrap();
    }

    let featured = h.posts.featured(3).await.unwrap();
    let titles: Vec<&str> = featured.iter().map(|i| i.post.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "A"]);

    assert_eq!(h.posts.featured(1).await.unwrap().len(), 1);
}
