//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hub_core::entities::{Currency, Member, MemberStatus, OAuthProvider};
use hub_core::error::DomainError;
use hub_core::traits::{MemberRepository, RepoResult};
use hub_core::value_objects::{Id, Page, PageRequest};

use crate::mappers::convert_all;
use crate::models::MemberModel;

use super::error::{map_db_error, map_unique_constraint};

const MEMBER_COLUMNS: &str = "id, email, nickname, profile_image, status, roles, provider, \
                              provider_id, created_at, updated_at";

/// Unique index names come from the init migration
fn member_conflict(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some("members_nickname_live_key") => DomainError::NicknameAlreadyExists,
        Some("members_provider_key") => {
            DomainError::validation("social account is already linked to a member")
        }
        _ => DomainError::EmailAlreadyExists,
    }
}

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, predicate: &str, bind: &str) -> RepoResult<Option<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE {predicate}");
        let result = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Member::try_from).transpose()
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1");
        let result = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Member::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>> {
        // the live holder wins; otherwise the most recent withdrawn account
        self.fetch_one_where(
            "email = $1 ORDER BY (status = 'WITHDRAWN'), id DESC LIMIT 1",
            email,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_provider(
        &self,
        provider: OAuthProvider,
        provider_id: &str,
    ) -> RepoResult<Option<Member>> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE provider = $1 AND provider_id = $2"
        );
        let result = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(provider.as_str())
            .bind(provider_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Member::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"SELECT EXISTS(SELECT 1 FROM members WHERE email = $1 AND status <> 'WITHDRAWN')",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn nickname_exists(&self, nickname: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"SELECT EXISTS(SELECT 1 FROM members WHERE nickname = $1 AND status <> 'WITHDRAWN')",
        )
        .bind(nickname)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, member, password_hash), fields(member_id = %member.id))]
    async fn create(&self, member: &Member, password_hash: Option<&str>) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO members (id, email, nickname, password_hash, profile_image, status, roles,
                                 provider, provider_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(member.id.into_inner())
        .bind(&member.email)
        .bind(&member.nickname)
        .bind(password_hash)
        .bind(member.profile_image.as_deref())
        .bind(member.status.as_str())
        .bind(member.roles.to_i32())
        .bind(member.provider.as_str())
        .bind(member.provider_id.as_deref())
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_constraint(e, member_conflict))?;

        for currency in Currency::ALL {
            sqlx::query(
                r"
                INSERT INTO accounts (member_id, currency, balance, updated_at)
                VALUES ($1, $2, 0, $3)
                ",
            )
            .bind(member.id.into_inner())
            .bind(currency.as_str())
            .bind(member.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, member), fields(member_id = %member.id))]
    async fn update(&self, member: &Member) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE members
            SET nickname = $2, profile_image = $3, status = $4, roles = $5, updated_at = $6
            WHERE id = $1
            ",
        )
        .bind(member.id.into_inner())
        .bind(&member.nickname)
        .bind(member.profile_image.as_deref())
        .bind(member.status.as_str())
        .bind(member.roles.to_i32())
        .bind(member.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_constraint(e, member_conflict))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MemberNotFound(member.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Id) -> RepoResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, Option<String>>(
            r"SELECT password_hash FROM members WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(hash.flatten())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Id, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"UPDATE members SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MemberNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        status: Option<MemberStatus>,
        page: PageRequest,
    ) -> RepoResult<Page<Member>> {
        let status = status.map(|s| s.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            r"SELECT COUNT(*) FROM members WHERE ($1::VARCHAR IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM members \
             WHERE ($1::VARCHAR IS NULL OR status = $1) \
             ORDER BY id DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(status)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(convert_all(rows)?, page, total))
    }

    #[instrument(skip(self))]
    async fn active_ids_after(&self, after: Option<Id>, limit: i64) -> RepoResult<Vec<Id>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM members
            WHERE status = 'ACTIVE' AND ($1::BIGINT IS NULL OR id > $1)
            ORDER BY id ASC
            LIMIT $2
            ",
        )
        .bind(after.map(Id::into_inner))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Id::new).collect())
    }
}
