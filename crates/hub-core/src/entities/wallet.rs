//! Token and ticket balances with their append-only ledger
//!
//! A member owns one account per [`Currency`]. Balances only move by
//! appending [`LedgerEntry`] rows; `balance_after` on the newest entry always
//! equals the account balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    Token,
    Ticket,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Token, Currency::Ticket];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "TOKEN",
            Self::Ticket => "TICKET",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "TOKEN" => Some(Self::Token),
            "TICKET" => Some(Self::Ticket),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerReason {
    CouponRedeem,
    WeeklyDistribution,
    AdminGrant,
    AdminDeduct,
    Exchange,
    RoadmapGeneration,
    RoadmapRefund,
}

impl LedgerReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CouponRedeem => "COUPON_REDEEM",
            Self::WeeklyDistribution => "WEEKLY_DISTRIBUTION",
            Self::AdminGrant => "ADMIN_GRANT",
            Self::AdminDeduct => "ADMIN_DEDUCT",
            Self::Exchange => "EXCHANGE",
            Self::RoadmapGeneration => "ROADMAP_GENERATION",
            Self::RoadmapRefund => "ROADMAP_REFUND",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "COUPON_REDEEM" => Some(Self::CouponRedeem),
            "WEEKLY_DISTRIBUTION" => Some(Self::WeeklyDistribution),
            "ADMIN_GRANT" => Some(Self::AdminGrant),
            "ADMIN_DEDUCT" => Some(Self::AdminDeduct),
            "EXCHANGE" => Some(Self::Exchange),
            "ROADMAP_GENERATION" => Some(Self::RoadmapGeneration),
            "ROADMAP_REFUND" => Some(Self::RoadmapRefund),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub member_id: Id,
    pub currency: Currency,
    pub balance: i64,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn open(member_id: Id, currency: Currency) -> Self {
        Self {
            member_id,
            currency,
            balance: 0,
            updated_at: Utc::now(),
        }
    }

    /// Balance after applying `amount`, or `InsufficientBalance` if it would
    /// go negative.
    pub fn balance_after(&self, amount: i64) -> Result<i64, DomainError> {
        let next = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| DomainError::validation("balance overflow"))?;
        if next < 0 {
            return Err(DomainError::InsufficientBalance {
                currency: self.currency,
                balance: self.balance,
                required: -amount,
            });
        }
        Ok(next)
    }
}

/// An applied, immutable ledger row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: Id,
    pub member_id: Id,
    pub currency: Currency,
    pub amount: i64,
    pub balance_after: i64,
    pub reason: LedgerReason,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A ledger movement requested by a service, not yet applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub id: Id,
    pub member_id: Id,
    pub currency: Currency,
    pub amount: i64,
    pub reason: LedgerReason,
    /// Idempotency key: at most one entry per (member, currency, reason, reference)
    pub reference: Option<String>,
}

impl NewLedgerEntry {
    pub fn credit(
        id: Id,
        member_id: Id,
        currency: Currency,
        amount: i64,
        reason: LedgerReason,
    ) -> Self {
        Self {
            id,
            member_id,
            currency,
            amount: amount.abs(),
            reason,
            reference: None,
        }
    }

    pub fn debit(
        id: Id,
        member_id: Id,
        currency: Currency,
        amount: i64,
        reason: LedgerReason,
    ) -> Self {
        Self {
            amount: -amount.abs(),
            ..Self::credit(id, member_id, currency, amount, reason)
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.amount == 0 {
            return Err(DomainError::InvalidAmount);
        }
        Ok(())
    }

    /// Key used to lock accounts in a deterministic order
    #[inline]
    pub fn account_key(&self) -> (Id, Currency) {
        (self.member_id, self.currency)
    }

    pub fn applied(self, balance_after: i64) -> LedgerEntry {
        LedgerEntry {
            id: self.id,
            member_id: self.member_id,
            currency: self.currency,
            amount: self.amount,
            balance_after,
            reason: self.reason,
            reference: self.reference,
            created_at: Utc::now(),
        }
    }
}
