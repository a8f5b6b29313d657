//! Post listing, creation and deletion on top of a [`PostsRepo`].

use std::sync::Arc;

use chrono_tz::Tz;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use crate::application::repos::{CreatePostParams, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{NewPost, format_post_date};
use crate::util::timezone::localized_date;

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("failed to compute post date: {0}")]
    Date(String),
}

pub struct PostService {
    repo: Arc<dyn PostsRepo>,
    timezone: Tz,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostsRepo>, timezone: Tz) -> Self {
        Self { repo, timezone }
    }

    pub async fn list_all(&self) -> Result<Vec<PostRecord>, PostServiceError> {
        Ok(self.repo.list_all().await?)
    }

    /// Store `post`, dated today in the site time zone.
    pub async fn create(&self, post: NewPost) -> Result<PostRecord, PostServiceError> {
        self.create_at(post, OffsetDateTime::now_utc()).await
    }

    pub async fn create_at(
        &self,
        post: NewPost,
        now: OffsetDateTime,
    ) -> Result<PostRecord, PostServiceError> {
        let date = self.post_date(now)?;
        let (title, content) = post.into_parts();

        let record = self
            .repo
            .create_post(CreatePostParams {
                title,
                content,
                date,
            })
            .await?;

        info!(
            target = "jotter::application::posts",
            post_id = record.id,
            "post created"
        );
        Ok(record)
    }

    /// Remove the post with `id`; a missing post is not an error.
    pub async fn delete(&self, id: i64) -> Result<bool, PostServiceError> {
        let removed = self.repo.delete_post(id).await?;
        info!(
            target = "jotter::application::posts",
            post_id = id,
            removed,
            "post delete requested"
        );
        Ok(removed)
    }

    pub async fn health_check(&self) -> Result<(), PostServiceError> {
        Ok(self.repo.health_check().await?)
    }

    pub fn post_date(&self, now: OffsetDateTime) -> Result<String, PostServiceError> {
        let date = localized_date(now, self.timezone).ok_or_else(|| {
            PostServiceError::Date(format!("{now} has no calendar date in {}", self.timezone))
        })?;
        format_post_date(date).map_err(|err| PostServiceError::Date(err.to_string()))
    }
}
