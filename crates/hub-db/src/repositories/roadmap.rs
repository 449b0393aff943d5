//! PostgreSQL implementation of RoadmapRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use hub_core::entities::Roadmap;
use hub_core::error::DomainError;
use hub_core::traits::{RepoResult, RoadmapRepository};
use hub_core::value_objects::{Id, Page, PageRequest};

use crate::mappers::convert_all;
use crate::models::RoadmapModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RoadmapRepository
#[derive(Clone)]
pub struct PgRoadmapRepository {
    pool: PgPool,
}

impl PgRoadmapRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoadmapRepository for PgRoadmapRepository {
    #[instrument(skip(self, roadmap), fields(roadmap_id = %roadmap.id))]
    async fn create(&self, roadmap: &Roadmap) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO roadmaps (id, member_id, topic, level, weeks, steps, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(roadmap.id.into_inner())
        .bind(roadmap.member_id.into_inner())
        .bind(&roadmap.topic)
        .bind(roadmap.level.as_str())
        .bind(roadmap.weeks)
        .bind(Json(&roadmap.steps))
        .bind(roadmap.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Roadmap>> {
        let result = sqlx::query_as::<_, RoadmapModel>(
            r"
            SELECT id, member_id, topic, level, weeks, steps, created_at
            FROM roadmaps
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Roadmap::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_member(&self, member_id: Id, page: PageRequest) -> RepoResult<Page<Roadmap>> {
        let total = sqlx::query_scalar::<_, i64>(r"SELECT COUNT(*) FROM roadmaps WHERE member_id = $1")
            .bind(member_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let rows = sqlx::query_as::<_, RoadmapModel>(
            r"
            SELECT id, member_id, topic, level, weeks, steps, created_at
            FROM roadmaps
            WHERE member_id = $1
            ORDER BY id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(member_id.into_inner())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Page::new(convert_all(rows)?, page, total))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query(r"DELETE FROM roadmaps WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RoadmapNotFound(id));
        }
        Ok(())
    }
}
