//! Wallet models -> entities

use hub_core::entities::{Account, Currency, LedgerEntry, LedgerReason};
use hub_core::error::DomainError;
use hub_core::value_objects::Id;

use super::parse_column;
use crate::models::{AccountModel, LedgerEntryModel};

impl TryFrom<AccountModel> for Account {
    type Error = DomainError;

    fn try_from(model: AccountModel) -> Result<Self, Self::Error> {
        Ok(Account {
            member_id: Id::new(model.member_id),
            currency: parse_column("currency", &model.currency, Currency::parse)?,
            balance: model.balance,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<LedgerEntryModel> for LedgerEntry {
    type Error = DomainError;

    fn try_from(model: LedgerEntryModel) -> Result<Self, Self::Error> {
        Ok(LedgerEntry {
            id: Id::new(model.id),
            member_id: Id::new(model.member_id),
            currency: parse_column("currency", &model.currency, Currency::parse)?,
            amount: model.amount,
            balance_after: model.balance_after,
            reason: parse_column("reason", &model.reason, LedgerReason::parse)?,
            reference: model.reference,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_entry_from_model() {
        let entry = LedgerEntry::try_from(LedgerEntryModel {
            id: 1,
            member_id: 2,
            currency: "TICKET".into(),
            amount: 5,
            balance_after: 5,
            reason: "WEEKLY_DISTRIBUTION".into(),
            reference: Some("weekly-2025-W10".into()),
            created_at: Utc::now(),
        })
        .unwrap();

        assert_eq!(entry.currency, Currency::Ticket);
        assert_eq!(entry.reason, LedgerReason::WeeklyDistribution);
        assert_eq!(entry.reference.as_deref(), Some("weekly-2025-W10"));
    }
}
