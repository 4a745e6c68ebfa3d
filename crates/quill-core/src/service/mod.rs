//! Use-case services.
//!
//! Each service is a thin facade over the repository ports. Services take the
//! caller's principal explicitly and return materialized read models.

mod assemble;
mod comment_service;
mod post_service;
mod search_service;

use std::sync::Arc;

pub use comment_service::CommentService;
pub use post_service::{DEFAULT_FEATURED_LIMIT, PostService};
pub use search_service::{DEFAULT_SEARCH_LIMIT, SearchService};

use crate::domain::{Principal, User};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};

/// The set of repository handles every service works against.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub comments: Arc<dyn CommentRepository>,
    /// Create the user row of an authenticated principal on first use.
    /// Only the in-memory server turns this on.
    pub provision_callers: bool,
}

impl Repositories {
    /// Turn on [`Repositories::provision_callers`].
    pub fn with_caller_provisioning(mut self) -> Self {
        self.provision_callers = true;
        self
    }

    /// Load the user row behind an authenticated principal.
    ///
    /// A principal whose user row does not exist is treated as anonymous,
    /// unless callers are provisioned.
    pub(crate) async fn caller(&self, principal: Option<&Principal>) -> DomainResult<User> {
        let principal = principal.ok_or(DomainError::Unauthenticated)?;
        if let Some(user) = self.users.find_by_id(principal.id).await? {
            return Ok(user);
        }
        if !self.provision_callers {
            tracing::warn!(user_id = %principal.id, "Principal has no user record");
            return Err(DomainError::Unauthenticated);
        }

        let mut user = User::new(principal.email.clone(), principal.name.clone());
        user.id = principal.id;
        user.image = principal.image.clone();
        match self.users.insert(user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Provisioned user record");
                Ok(user)
            }
            // Lost a race with a parallel request of the same principal.
            Err(RepoError::Constraint(_)) => self
                .users
                .find_by_id(principal.id)
                .await?
                .ok_or(DomainError::Unauthenticated),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests;
