//! Wallet service - token and ticket balances over an append-only ledger
//!
//! Every balance change goes through [`LedgerRepository::apply`], which locks
//! the affected accounts and applies the whole batch or nothing. Successful
//! changes are announced on the member's event channel.

use chrono::{DateTime, Datelike, Utc};
use hub_core::events::BalanceChangedEvent;
use hub_core::{
    Currency, DomainError, DomainEvent, EventChannel, Id, LedgerEntry, LedgerReason,
    NewLedgerEntry, Page, PageRequest,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::dto::{
    AdjustBalanceRequest, BalanceResponse, ExchangeRequest, ExchangeResponse, LedgerEntryResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::member::MemberService;

/// Outcome of one weekly distribution run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistributionReport {
    pub reference: String,
    pub granted: u64,
    /// Already granted this week
    pub skipped: u64,
    pub failed: u64,
}

/// Idempotency key shared by every grant in the same ISO week
pub fn weekly_reference(now: DateTime<Utc>) -> String {
    let week = now.iso_week();
    format!("weekly-{}-W{:02}", week.year(), week.week())
}

pub struct WalletService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WalletService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn balances(&self, member_id: Id) -> ServiceResult<BalanceResponse> {
        let accounts = self.ctx.ledger_repo().balances(member_id).await?;
        Ok(BalanceResponse::from(accounts.as_slice()))
    }

    pub async fn history(
        &self,
        member_id: Id,
        currency: Option<Currency>,
        page: PageRequest,
    ) -> ServiceResult<Page<LedgerEntryResponse>> {
        let entries = self
            .ctx
            .ledger_repo()
            .history(member_id, currency, page)
            .await?;
        Ok(entries.map(LedgerEntryResponse::from))
    }

    /// Apply entries atomically, then announce each balance change
    pub(crate) async fn apply_and_publish(
        &self,
        entries: &[NewLedgerEntry],
    ) -> ServiceResult<Vec<LedgerEntry>> {
        let applied = self.ctx.ledger_repo().apply(entries).await?;
        for entry in &applied {
            self.publish_change(entry).await;
        }
        Ok(applied)
    }

    pub(crate) async fn publish_change(&self, entry: &LedgerEntry) {
        let event = DomainEvent::BalanceChanged(BalanceChangedEvent {
            member_id: entry.member_id,
            currency: entry.currency,
            amount: entry.amount,
            balance: entry.balance_after,
            reason: entry.reason,
            timestamp: entry.created_at,
        });
        self.ctx
            .publish(EventChannel::Member(entry.member_id), event)
            .await;
    }

    /// Trade tokens for tickets at the configured rate
    #[instrument(skip(self, request), fields(tickets = request.tickets))]
    pub async fn exchange(
        &self,
        member_id: Id,
        request: ExchangeRequest,
    ) -> ServiceResult<ExchangeResponse> {
        if request.tickets <= 0 {
            return Err(DomainError::InvalidAmount.into());
        }
        let tokens = request
            .tickets
            .checked_mul(self.ctx.wallet_config().tokens_per_ticket)
            .ok_or_else(|| ServiceError::validation("Exchange amount is too large"))?;

        let reference = format!("exchange-{}", self.ctx.generate_id());
        let entries = [
            NewLedgerEntry::debit(
                self.ctx.generate_id(),
                member_id,
                Currency::Token,
                tokens,
                LedgerReason::Exchange,
            )
            .with_reference(reference.clone()),
            NewLedgerEntry::credit(
                self.ctx.generate_id(),
                member_id,
                Currency::Ticket,
                request.tickets,
                LedgerReason::Exchange,
            )
            .with_reference(reference),
        ];
        self.apply_and_publish(&entries).await?;

        info!(member_id = %member_id, tokens, tickets = request.tickets, "Tokens exchanged");
        Ok(ExchangeResponse {
            tokens_spent: tokens,
            tickets_received: request.tickets,
            balances: self.balances(member_id).await?,
        })
    }

    /// Spend tickets for a paid feature
    pub(crate) async fn use_tickets(
        &self,
        member_id: Id,
        amount: i64,
        reason: LedgerReason,
        reference: &str,
    ) -> ServiceResult<LedgerEntry> {
        let entry = NewLedgerEntry::debit(
            self.ctx.generate_id(),
            member_id,
            Currency::Ticket,
            amount,
            reason,
        )
        .with_reference(reference);
        self.single(entry).await
    }

    /// Return tickets taken by [`Self::use_tickets`]
    pub(crate) async fn refund_tickets(
        &self,
        member_id: Id,
        amount: i64,
        reason: LedgerReason,
        reference: &str,
    ) -> ServiceResult<LedgerEntry> {
        let entry = NewLedgerEntry::credit(
            self.ctx.generate_id(),
            member_id,
            Currency::Ticket,
            amount,
            reason,
        )
        .with_reference(reference);
        self.single(entry).await
    }

    async fn single(&self, entry: NewLedgerEntry) -> ServiceResult<LedgerEntry> {
        self.apply_and_publish(std::slice::from_ref(&entry))
            .await?
            .pop()
            .ok_or_else(|| ServiceError::internal("ledger returned no entry"))
    }

    #[instrument(skip(self, request), fields(member_id = %request.member_id))]
    pub async fn grant(
        &self,
        admin_id: Id,
        request: AdjustBalanceRequest,
    ) -> ServiceResult<LedgerEntryResponse> {
        self.adjust(admin_id, request, LedgerReason::AdminGrant).await
    }

    #[instrument(skip(self, request), fields(member_id = %request.member_id))]
    pub async fn deduct(
        &self,
        admin_id: Id,
        request: AdjustBalanceRequest,
    ) -> ServiceResult<LedgerEntryResponse> {
        self.adjust(admin_id, request, LedgerReason::AdminDeduct).await
    }

    async fn adjust(
        &self,
        admin_id: Id,
        request: AdjustBalanceRequest,
        reason: LedgerReason,
    ) -> ServiceResult<LedgerEntryResponse> {
        if request.amount <= 0 {
            return Err(DomainError::InvalidAmount.into());
        }
        MemberService::new(self.ctx).load(request.member_id).await?;

        let id = self.ctx.generate_id();
        let mut entry = if reason == LedgerReason::AdminDeduct {
            NewLedgerEntry::debit(id, request.member_id, request.currency, request.amount, reason)
        } else {
            NewLedgerEntry::credit(id, request.member_id, request.currency, request.amount, reason)
        };
        if let Some(reference) = request.reference {
            entry = entry.with_reference(reference);
        }

        let applied = self.single(entry).await?;
        info!(
            admin_id = %admin_id,
            member_id = %applied.member_id,
            currency = applied.currency.as_str(),
            amount = applied.amount,
            "Balance adjusted by admin"
        );
        Ok(LedgerEntryResponse::from(applied))
    }

    /// Grant the weekly tickets to every active member.
    ///
    /// Members are walked in id order in batches. A member already granted in
    /// this ISO week is skipped; any other failure is logged and counted, and
    /// the run continues.
    #[instrument(skip(self))]
    pub async fn distribute_weekly(&self, now: DateTime<Utc>) -> ServiceResult<DistributionReport> {
        let config = self.ctx.wallet_config();
        let batch_size = config.distribution_batch_size.max(1);
        let amount = config.weekly_ticket_amount;

        let mut report = DistributionReport {
            reference: weekly_reference(now),
            ..DistributionReport::default()
        };
        if amount <= 0 {
            warn!(amount, "Weekly distribution disabled by configuration");
            return Ok(report);
        }

        let mut cursor = None;
        loop {
            let ids = self
                .ctx
                .member_repo()
                .active_ids_after(cursor, batch_size)
                .await?;
            let Some(&last) = ids.last() else {
                break;
            };
            cursor = Some(last);

            for member_id in &ids {
                let entry = NewLedgerEntry::credit(
                    self.ctx.generate_id(),
                    *member_id,
                    Currency::Ticket,
                    amount,
                    LedgerReason::WeeklyDistribution,
                )
                .with_reference(report.reference.clone());

                match self.single(entry).await {
                    Ok(_) => report.granted += 1,
                    Err(e) if matches!(e.as_domain(), Some(DomainError::DuplicateTransaction(_))) => {
                        report.skipped += 1;
                    }
                    Err(e) => {
                        warn!(member_id = %member_id, error = %e, "Weekly distribution failed for member");
                        report.failed += 1;
                    }
                }
            }

            if (ids.len() as i64) < batch_size {
                break;
            }
        }

        info!(
            reference = %report.reference,
            granted = report.granted,
            skipped = report.skipped,
            failed = report.failed,
            "Weekly distribution finished"
        );
        Ok(report)
    }
}
