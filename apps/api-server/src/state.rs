//! Application state - shared across all handlers.

use quill_core::service::{CommentService, PostService, Repositories, SearchService};
use quill_infra::InMemoryStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub search: SearchService,
}

impl AppState {
    pub fn from_repositories(repos: Repositories) -> Self {
        Self {
            posts: PostService::new(repos.clone()),
            comments: CommentService::new(repos.clone()),
            search: SearchService::new(repos),
        }
    }

    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        if let Some(repos) = Self::connect_postgres(config).await {
            tracing::info!("Application state initialized (postgres)");
            return Self::from_repositories(repos);
        }

        #[cfg(not(feature = "postgres"))]
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }

        // No users table is fed in this mode, so token holders get a row on
        // their first write.
        tracing::info!("Application state initialized (in-memory)");
        Self::from_repositories(InMemoryStore::new().repositories().with_caller_provisioning())
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(config: &AppConfig) -> Option<Repositories> {
        use migration::{Migrator, MigratorTrait};

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        let db = match quill_infra::connect(db_config).await {
            Ok(db) => db,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                return None;
            }
        };

        if config.auto_migrate {
            match Migrator::up(&db, None).await {
                Ok(()) => tracing::info!("Migrations applied"),
                Err(e) => tracing::error!(error = %e, "Failed to apply migrations"),
            }
        }

        Some(quill_infra::postgres_repositories(db))
    }
}
