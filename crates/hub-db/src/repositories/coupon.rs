//! PostgreSQL implementation of CouponRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use hub_core::entities::{Coupon, LedgerEntry, LedgerReason, NewLedgerEntry};
use hub_core::error::DomainError;
use hub_core::traits::{CouponRepository, RepoResult};
use hub_core::value_objects::{Id, Page, PageRequest};

use crate::mappers::convert_all;
use crate::models::CouponModel;

use super::error::{map_db_error, map_foreign_key_violation, map_unique_violation};
use super::ledger::apply_entries;

const COUPON_COLUMNS: &str =
    "id, code, currency, amount, expires_at, member_id, used_at, created_at";

/// PostgreSQL implementation of CouponRepository
#[derive(Clone)]
pub struct PgCouponRepository {
    pool: PgPool,
}

impl PgCouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Fetch a coupon with a row lock held until the transaction ends
async fn lock_coupon(
    conn: &mut PgConnection,
    predicate: &str,
    key: CouponKey<'_>,
) -> RepoResult<Option<Coupon>> {
    let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE {predicate} FOR UPDATE");
    let query = sqlx::query_as::<_, CouponModel>(&sql);
    let query = match key {
        CouponKey::Id(id) => query.bind(id.into_inner()),
        CouponKey::Code(code) => query.bind(code),
    };
    let result = query.fetch_optional(&mut *conn).await.map_err(map_db_error)?;

    result.map(Coupon::try_from).transpose()
}

enum CouponKey<'a> {
    Id(Id),
    Code(&'a str),
}

async fn store_owner(conn: &mut PgConnection, coupon: &Coupon) -> RepoResult<()> {
    sqlx::query(r"UPDATE coupons SET member_id = $2, used_at = $3 WHERE id = $1")
        .bind(coupon.id.into_inner())
        .bind(coupon.member_id.map(Id::into_inner))
        .bind(coupon.used_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || match coupon.member_id {
                Some(member_id) => DomainError::MemberNotFound(member_id),
                None => DomainError::CouponNotFound,
            })
        })?;

    Ok(())
}

#[async_trait]
impl CouponRepository for PgCouponRepository {
    #[instrument(skip(self, coupons), fields(count = coupons.len()))]
    async fn create_many(&self, coupons: &[Coupon]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for coupon in coupons {
            sqlx::query(
                r"
                INSERT INTO coupons (id, code, currency, amount, expires_at, member_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(coupon.id.into_inner())
            .bind(&coupon.code)
            .bind(coupon.currency.as_str())
            .bind(coupon.amount)
            .bind(coupon.expires_at)
            .bind(coupon.member_id.map(Id::into_inner))
            .bind(coupon.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::CouponCodeExists))?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Coupon>> {
        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE id = $1");
        let result = sqlx::query_as::<_, CouponModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Coupon::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &str) -> RepoResult<Option<Coupon>> {
        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE code = $1");
        let result = sqlx::query_as::<_, CouponModel>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Coupon::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn assign(&self, coupon_id: Id, member_id: Id, now: DateTime<Utc>) -> RepoResult<Coupon> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let mut coupon = lock_coupon(&mut *tx, "id = $1", CouponKey::Id(coupon_id))
            .await?
            .ok_or(DomainError::CouponNotFound)?;
        coupon.assign(member_id, now)?;
        store_owner(&mut *tx, &coupon).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(coupon)
    }

    #[instrument(skip(self, code))]
    async fn redeem(
        &self,
        code: &str,
        member_id: Id,
        entry_id: Id,
        now: DateTime<Utc>,
    ) -> RepoResult<(Coupon, LedgerEntry)> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let mut coupon = lock_coupon(&mut *tx, "code = $1", CouponKey::Code(code))
            .await?
            .ok_or(DomainError::CouponNotFound)?;
        coupon.redeem(member_id, now)?;
        store_owner(&mut *tx, &coupon).await?;

        let credit = NewLedgerEntry::credit(
            entry_id,
            member_id,
            coupon.currency,
            coupon.amount,
            LedgerReason::CouponRedeem,
        )
        .with_reference(coupon.id.to_string());

        let mut applied = apply_entries(&mut *tx, &[credit]).await?;
        let entry = applied
            .pop()
            .ok_or_else(|| DomainError::InternalError("coupon credit not applied".to_string()))?;

        tx.commit().await.map_err(map_db_error)?;

        info!(coupon_id = %coupon.id, member_id = %member_id, amount = coupon.amount, "Coupon redeemed");
        Ok((coupon, entry))
    }

    #[instrument(skip(self))]
    async fn list(&self, page: PageRequest) -> RepoResult<Page<Coupon>> {
        let total = sqlx::query_scalar::<_, i64>(r"SELECT COUNT(*) FROM coupons")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let sql = format!(
            "SELECT {COUPON_COLUMNS} FROM coupons ORDER BY id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, CouponModel>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(convert_all(rows)?, page, total))
    }

    #[instrument(skip(self))]
    async fn list_by_member(&self, member_id: Id) -> RepoResult<Vec<Coupon>> {
        let sql = format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE member_id = $1 ORDER BY id DESC"
        );
        let rows = sqlx::query_as::<_, CouponModel>(&sql)
            .bind(member_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        convert_all(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgCouponRepository>();
    }
}
