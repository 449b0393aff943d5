//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hub_core::entities::{Post, PostView};
use hub_core::error::DomainError;
use hub_core::traits::{PostQuery, PostRepository, RepoResult};
use hub_core::value_objects::{Id, Page, PageRequest};

use crate::mappers::convert_all;
use crate::models::{PostModel, PostViewModel};

use super::error::{like_pattern, map_db_error};

/// Post columns plus author nickname and live like/comment counts
const POST_VIEW_SELECT: &str = r"
    SELECT p.id, p.author_id, p.category, p.title, p.content, p.view_count,
           p.created_at, p.updated_at, p.deleted_at,
           m.nickname AS author_nickname,
           (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS like_count,
           (SELECT COUNT(*) FROM comments c
             WHERE c.post_id = p.id AND c.deleted_at IS NULL) AS comment_count
    FROM posts p
    JOIN members m ON m.id = p.author_id
";

const POST_FILTER: &str = r"
    WHERE p.deleted_at IS NULL
      AND ($1::VARCHAR IS NULL OR p.category = $1)
      AND ($2::TEXT IS NULL OR p.title ILIKE $2 OR p.content ILIKE $2)
      AND ($3::BIGINT IS NULL OR p.author_id = $3)
";

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, author_id, category, title, content, view_count,
                   created_at, updated_at, deleted_at
            FROM posts
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Post::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_view(&self, id: Id) -> RepoResult<Option<PostView>> {
        let sql = format!("{POST_VIEW_SELECT} WHERE p.id = $1 AND p.deleted_at IS NULL");
        let result = sqlx::query_as::<_, PostViewModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(PostView::try_from).transpose()
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, author_id, category, title, content, view_count,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(post.id.into_inner())
        .bind(post.author_id.into_inner())
        .bind(post.category.as_str())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.view_count)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn update(&self, post: &Post) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET category = $2, title = $3, content = $4, updated_at = $5
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(post.id.into_inner())
        .bind(post.category.as_str())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(post.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query(
            r"UPDATE posts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_view_count(&self, id: Id) -> RepoResult<()> {
        sqlx::query(
            r"UPDATE posts SET view_count = view_count + 1 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &PostQuery, page: PageRequest) -> RepoResult<Page<PostView>> {
        let category = query.category.map(|c| c.as_str());
        let keyword = query
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(like_pattern);
        let author_id = query.author_id.map(Id::into_inner);

        let count_sql = format!("SELECT COUNT(*) FROM posts p {POST_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(category)
            .bind(keyword.as_deref())
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        if total == 0 {
            return Ok(Page::empty(page));
        }

        let sql = format!("{POST_VIEW_SELECT} {POST_FILTER} ORDER BY p.id DESC LIMIT $4 OFFSET $5");
        let rows = sqlx::query_as::<_, PostViewModel>(&sql)
            .bind(category)
            .bind(keyword.as_deref())
            .bind(author_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(convert_all(rows)?, page, total))
    }

    #[instrument(skip(self))]
    async fn list_liked_by(&self, member_id: Id, page: PageRequest) -> RepoResult<Page<PostView>> {
        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM post_likes pl
            JOIN posts p ON p.id = pl.post_id
            WHERE pl.member_id = $1 AND p.deleted_at IS NULL
            ",
        )
        .bind(member_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let sql = format!(
            "{POST_VIEW_SELECT} \
             JOIN post_likes pl ON pl.post_id = p.id AND pl.member_id = $1 \
             WHERE p.deleted_at IS NULL \
             ORDER BY pl.created_at DESC, p.id DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, PostViewModel>(&sql)
            .bind(member_id.into_inner())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(convert_all(rows)?, page, total))
    }
}
