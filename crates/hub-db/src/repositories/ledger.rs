//! PostgreSQL implementation of LedgerRepository
//!
//! Balances live in `accounts`; every change appends to `ledger_entries`.
//! Both are written in one transaction while the touched account rows are
//! locked with `SELECT ... FOR UPDATE` in (member, currency) order, so two
//! concurrent transfers can never deadlock on each other.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use hub_core::entities::{Account, Currency, LedgerEntry, NewLedgerEntry};
use hub_core::error::DomainError;
use hub_core::traits::{LedgerRepository, RepoResult};
use hub_core::value_objects::{Id, Page, PageRequest};

use crate::mappers::convert_all;
use crate::models::{AccountModel, LedgerEntryModel};

use super::error::{map_db_error, map_foreign_key_violation, map_unique_violation};

/// PostgreSQL implementation of LedgerRepository
#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Lock (opening if needed) one account row inside the caller's transaction
async fn lock_account(
    conn: &mut PgConnection,
    member_id: Id,
    currency: Currency,
) -> RepoResult<Account> {
    sqlx::query(
        r"
        INSERT INTO accounts (member_id, currency, balance, updated_at)
        VALUES ($1, $2, 0, NOW())
        ON CONFLICT (member_id, currency) DO NOTHING
        ",
    )
    .bind(member_id.into_inner())
    .bind(currency.as_str())
    .execute(&mut *conn)
    .await
    .map_err(|e| map_foreign_key_violation(e, || DomainError::MemberNotFound(member_id)))?;

    let model = sqlx::query_as::<_, AccountModel>(
        r"
        SELECT member_id, currency, balance, updated_at
        FROM accounts
        WHERE member_id = $1 AND currency = $2
        FOR UPDATE
        ",
    )
    .bind(member_id.into_inner())
    .bind(currency.as_str())
    .fetch_one(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Account::try_from(model)
}

/// Apply `entries` inside an open transaction; the caller commits.
///
/// Any error leaves the transaction dirty; dropping it rolls back.
pub(crate) async fn apply_entries(
    conn: &mut PgConnection,
    entries: &[NewLedgerEntry],
) -> RepoResult<Vec<LedgerEntry>> {
    for entry in entries {
        entry.validate()?;
    }

    let keys: BTreeSet<(Id, Currency)> = entries.iter().map(NewLedgerEntry::account_key).collect();

    let mut accounts = BTreeMap::new();
    for (member_id, currency) in keys {
        let account = lock_account(conn, member_id, currency).await?;
        accounts.insert((member_id, currency), account);
    }

    let mut applied = Vec::with_capacity(entries.len());
    for entry in entries {
        let account = accounts
            .get_mut(&entry.account_key())
            .ok_or_else(|| DomainError::InternalError("account lock missing".to_string()))?;
        account.balance = account.balance_after(entry.amount)?;
        applied.push(entry.clone().applied(account.balance));
    }

    for account in accounts.values() {
        sqlx::query(
            r"
            UPDATE accounts SET balance = $3, updated_at = NOW()
            WHERE member_id = $1 AND currency = $2
            ",
        )
        .bind(account.member_id.into_inner())
        .bind(account.currency.as_str())
        .bind(account.balance)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;
    }

    for entry in &applied {
        sqlx::query(
            r"
            INSERT INTO ledger_entries (id, member_id, currency, amount, balance_after,
                                        reason, reference, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(entry.id.into_inner())
        .bind(entry.member_id.into_inner())
        .bind(entry.currency.as_str())
        .bind(entry.amount)
        .bind(entry.balance_after)
        .bind(entry.reason.as_str())
        .bind(entry.reference.as_deref())
        .bind(entry.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::DuplicateTransaction(entry.reference.clone().unwrap_or_default())
            })
        })?;
    }

    debug!(entries = applied.len(), "Ledger entries applied");
    Ok(applied)
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    #[instrument(skip(self))]
    async fn balances(&self, member_id: Id) -> RepoResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountModel>(
            r"
            SELECT member_id, currency, balance, updated_at
            FROM accounts
            WHERE member_id = $1
            ",
        )
        .bind(member_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let stored: Vec<Account> = convert_all(rows)?;

        Ok(Currency::ALL
            .into_iter()
            .map(|currency| {
                stored
                    .iter()
                    .find(|a| a.currency == currency)
                    .copied()
                    .unwrap_or_else(|| Account::open(member_id, currency))
            })
            .collect())
    }

    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    async fn apply(&self, entries: &[NewLedgerEntry]) -> RepoResult<Vec<LedgerEntry>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let applied = apply_entries(&mut *tx, entries).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(applied)
    }

    #[instrument(skip(self))]
    async fn history(
        &self,
        member_id: Id,
        currency: Option<Currency>,
        page: PageRequest,
    ) -> RepoResult<Page<LedgerEntry>> {
        let currency = currency.map(|c| c.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM ledger_entries
            WHERE member_id = $1 AND ($2::VARCHAR IS NULL OR currency = $2)
            ",
        )
        .bind(member_id.into_inner())
        .bind(currency)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let rows = sqlx::query_as::<_, LedgerEntryModel>(
            r"
            SELECT id, member_id, currency, amount, balance_after, reason, reference, created_at
            FROM ledger_entries
            WHERE member_id = $1 AND ($2::VARCHAR IS NULL OR currency = $2)
            ORDER BY id DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(member_id.into_inner())
        .bind(currency)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Page::new(convert_all(rows)?, page, total))
    }
}
