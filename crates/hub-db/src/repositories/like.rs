//! PostgreSQL implementation of LikeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hub_core::entities::PostLike;
use hub_core::error::DomainError;
use hub_core::traits::{LikeRepository, RepoResult};
use hub_core::value_objects::Id;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of LikeRepository
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    #[instrument(skip(self))]
    async fn create(&self, like: &PostLike) -> RepoResult<()> {
        sqlx::query(
            r"INSERT INTO post_likes (post_id, member_id, created_at) VALUES ($1, $2, $3)",
        )
        .bind(like.post_id.into_inner())
        .bind(like.member_id.into_inner())
        .bind(like.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyLiked))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, post_id: Id, member_id: Id) -> RepoResult<bool> {
        let result = sqlx::query(r"DELETE FROM post_likes WHERE post_id = $1 AND member_id = $2")
            .bind(post_id.into_inner())
            .bind(member_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn exists(&self, post_id: Id, member_id: Id) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"SELECT EXISTS(SELECT 1 FROM post_likes WHERE post_id = $1 AND member_id = $2)",
        )
        .bind(post_id.into_inner())
        .bind(member_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
