#![allow(dead_code)]

use quill_core::domain::{Principal, User};
use quill_core::service::{CommentService, PostService, Repositories, SearchService};
use quill_core::validation::NewPost;
use quill_infra::InMemoryStore;

pub struct Harness {
    pub repos: Repositories,
    pub posts: PostService,
    pub comments: CommentService,
    pub search: SearchService,
}

impl Harness {
    pub fn new() -> Self {
        Self::from_repos(InMemoryStore::new().repositories())
    }

    pub fn from_repos(repos: Repositories) -> Self {
        Self {
            posts: PostService::new(repos.clone()),
            comments: CommentService::new(repos.clone()),
            search: SearchService::new(repos.clone()),
            repos,
        }
    }

    /// Store a user and return the principal the identity system would report.
    pub async fn user(&self, email: &str, name: &str) -> Principal {
        let user = self
            .repos
            .users
            .insert(User::new(email, name).with_bio("Writes things."))
            .await
            .unwrap();
        Principal {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
        }
    }
}

pub fn new_post(title: &str, content: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: content.to_string(),
        ..Default::default()
    }
}

pub fn tags(names: &[&str]) -> Option<Vec<String>> {
    Some(names.iter().map(|n| n.to_string()).collect())
}
