//! Application state - shared across all handlers.

use std::sync::Arc;

use bloglist_core::ports::{BlogRepository, PasswordService, TokenService, UserRepository};
use bloglist_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
use bloglist_infra::database::{InMemoryBlogRepository, InMemoryUserRepository};

use crate::config::AppConfig;

/// Shared application state.
///
/// Every store handle is constructed here and passed in, so each test can
/// build its own isolated instance.
#[derive(Clone)]
pub struct AppState {
    pub blogs: Arc<dyn BlogRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        let (blogs, users) = match config.database.as_ref() {
            Some(db_config) => Self::database_repositories(db_config).await?,
            None => {
                tracing::warn!("No database URL set. Running on the in-memory store.");
                Self::memory_repositories()
            }
        };

        tracing::info!("Application state initialized");

        Ok(Self {
            blogs,
            users,
            tokens,
            passwords,
        })
    }

    /// State backed by fresh in-memory stores.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        let (blogs, users) = Self::memory_repositories();

        Self {
            blogs,
            users,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    fn memory_repositories() -> (Arc<dyn BlogRepository>, Arc<dyn UserRepository>) {
        (
            Arc::new(InMemoryBlogRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        )
    }

    #[cfg(feature = "postgres")]
    async fn database_repositories(
        db_config: &bloglist_infra::database::DatabaseConfig,
    ) -> anyhow::Result<(Arc<dyn BlogRepository>, Arc<dyn UserRepository>)> {
        use bloglist_infra::database::{PostgresBlogRepository, PostgresUserRepository, connect};
        use migration::{Migrator, MigratorTrait};

        let conn = Arc::new(connect(db_config).await?);
        Migrator::up(&*conn, None).await?;
        tracing::info!("Database migrations applied");

        Ok((
            Arc::new(PostgresBlogRepository::new(Arc::clone(&conn))),
            Arc::new(PostgresUserRepository::new(conn)),
        ))
    }

    #[cfg(not(feature = "postgres"))]
    async fn database_repositories(
        _db_config: &bloglist_infra::database::DatabaseConfig,
    ) -> anyhow::Result<(Arc<dyn BlogRepository>, Arc<dyn UserRepository>)> {
        tracing::warn!("Built without the postgres feature - ignoring database URL");
        Ok(Self::memory_repositories())
    }
}
