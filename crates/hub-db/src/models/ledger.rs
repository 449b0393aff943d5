//! Wallet database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the accounts table
#[derive(Debug, Clone, FromRow)]
pub struct AccountModel {
    pub member_id: i64,
    pub currency: String,
    pub balance: i64,
    pub updated_at: DateTime<Utc>,
}

/// Database model for the append-only ledger_entries table
#[derive(Debug, Clone, FromRow)]
pub struct LedgerEntryModel {
    pub id: i64,
    pub member_id: i64,
    pub currency: String,
    pub amount: i64,
    pub balance_after: i64,
    pub reason: String,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}
