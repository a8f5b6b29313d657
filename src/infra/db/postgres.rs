use async_trait::async_trait;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    query, query_as,
};

use crate::application::repos::{CreatePostParams, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;

use super::{map_sqlx_error, types::PostRow};

// Tables created by older deployments use SERIAL ids, so reads cast to BIGINT.
const CREATE_POSTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        date TEXT NOT NULL
    )
"#;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: PgPool,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn initialize(&self) -> Result<(), RepoError> {
        query(CREATE_POSTS_TABLE)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<PostRecord>, RepoError> {
        let rows = query_as::<_, PostRow>(
            "SELECT id::BIGINT AS id, title, content, date FROM posts ORDER BY id DESC",
        )
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
            VALUES ($1, $2, $3)
            RETURNING id::BIGINT AS id, title, content, date
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
        let result = query("DELETE FROM posts WHERE id = $1")
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
