use std::path::Path;

use async_trait::async_trait;
use sqlx::{
    query, query_as,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};

use crate::application::repos::{CreatePostParams, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;

use super::{map_sqlx_error, types::PostRow};

// AUTOINCREMENT keeps ids of deleted rows from being handed out again.
const CREATE_POSTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        date TEXT NOT NULL
    )
"#;

/// File-backed store used when no external database is configured.
#[derive(Clone)]
pub struct SqliteRepositories {
    pool: SqlitePool,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open (creating if missing) the database file at `path`.
    pub async fn connect(path: &Path, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
    }
}

#[async_trait]
impl PostsRepo for SqliteRepositories {
    async fn initialize(&self) -> Result<(), RepoError> {
        query(CREATE_POSTS_TABLE)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<PostRecord>, RepoError> {
        let rows =
            query_as::<_, PostRow>("SELECT id, title, content, date FROM posts ORDER BY id DESC")
                .fetch_all(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            title,
            content,
            date,
        } = params;

        let row = query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, date)
            VALUES (?, ?, ?)
            RETURNING id, title, content, date
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(date)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, RepoError> {
        let result = query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}
