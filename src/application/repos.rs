//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::PostRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
    pub date: String,
}

/// Storage for blog posts.
///
/// Implementations check a connection out of their pool per call and never
/// hold one across calls.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Create the `posts` table when it does not exist yet. Safe to call on every start.
    async fn initialize(&self) -> Result<(), RepoError>;

    /// Every post, newest (highest id) first.
    async fn list_all(&self) -> Result<Vec<PostRecord>, RepoError>;

    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    /// Remove the post with `id`. Returns `false` when no such post existed.
    async fn delete_post(&self, id: i64) -> Result<bool, RepoError>;

    async fn health_check(&self) -> Result<(), RepoError>;
}
