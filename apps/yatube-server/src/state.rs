//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::PostService;
use yatube_core::ports::{
    GroupRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use yatube_infra::database::DatabaseConnections;
use yatube_infra::{
    Argon2PasswordService, InMemoryGroupRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use yatube_infra::database::{
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

/// The three stores, all backed by the same engine.
struct Repositories {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            groups: Arc::new(InMemoryGroupRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: &DatabaseConnections) -> Self {
        Self {
            posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
            groups: Arc::new(PostgresGroupRepository::new(connections.main.clone())),
            users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::from_env());

        #[cfg(feature = "postgres")]
        let (db, repos) = connect(config).await;

        #[cfg(not(feature = "postgres"))]
        let (db, repos) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            (None, Repositories::in_memory())
        };

        let state = Self::assemble(repos, db, tokens, passwords, config.page_size);
        tracing::info!(
            page_size = config.page_size,
            storage = state.storage(),
            "Application state initialized"
        );
        state
    }

    /// State over fresh in-memory stores.
    #[cfg(test)]
    pub fn in_memory(
        page_size: u64,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self::assemble(Repositories::in_memory(), None, tokens, passwords, page_size)
    }

    fn assemble(
        repos: Repositories,
        db: Option<Arc<DatabaseConnections>>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        page_size: u64,
    ) -> Self {
        let posts = PostService::new(repos.posts, repos.groups.clone(), repos.users.clone())
            .with_page_size(page_size);

        Self {
            posts,
            users: repos.users,
            groups: repos.groups,
            tokens,
            passwords,
            db,
        }
    }

    /// Which store backs the repositories.
    pub fn storage(&self) -> &'static str {
        if self.db.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }
}

#[cfg(feature = "postgres")]
async fn connect(config: &AppConfig) -> (Option<Arc<DatabaseConnections>>, Repositories) {
    use migration::{Migrator, MigratorTrait};

    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return (None, Repositories::in_memory());
    };

    match DatabaseConnections::init(db_config).await {
        Ok(connections) => {
            if config.auto_migrate {
                match Migrator::up(&connections.main, None).await {
                    Ok(()) => tracing::info!("Database migrations applied"),
                    Err(e) => tracing::error!(error = %e, "Failed to apply migrations"),
                }
            }
            let repos = Repositories::postgres(&connections);
            (Some(Arc::new(connections)), repos)
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            (None, Repositories::in_memory())
        }
    }
}
