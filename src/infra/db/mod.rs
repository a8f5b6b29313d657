//! Relational post stores: Postgres for deployments, SQLite as the embedded fallback.

mod postgres;
mod sqlite;
mod types;
mod util;

pub use postgres::PostgresRepositories;
pub use sqlite::SqliteRepositories;
pub use util::map_sqlx_error;

use std::sync::Arc;

use tracing::info;

use crate::application::repos::PostsRepo;
use crate::config::{DatabaseBackend, DatabaseSettings};

use super::error::InfraError;

/// Open the store selected by `settings` and make sure its table exists.
pub async fn open_posts_repo(settings: &DatabaseSettings) -> Result<Arc<dyn PostsRepo>, InfraError> {
    let max_connections = settings.max_connections.get();

    let repo: Arc<dyn PostsRepo> = match &settings.backend {
        DatabaseBackend::Postgres { url } => {
            let pool = PostgresRepositories::connect(url, max_connections)
                .await
                .map_err(|err| InfraError::database(err.to_string()))?;
            info!(
                target = "jotter::infra::db",
                backend = "postgres",
                max_connections,
                "database connected"
            );
            Arc::new(PostgresRepositories::new(pool))
        }
        DatabaseBackend::Sqlite { path } => {
            let pool = SqliteRepositories::connect(path, max_connections)
                .await
                .map_err(|err| InfraError::database(err.to_string()))?;
            info!(
                target = "jotter::infra::db",
                backend = "sqlite",
                path = %path.display(),
                max_connections,
                "database connected"
            );
            Arc::new(SqliteRepositories::new(pool))
        }
    };

    repo.initialize()
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;

    Ok(repo)
}
