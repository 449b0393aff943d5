//! Coupon service - issuing, assigning and redeeming coupons

use std::collections::HashSet;

use chrono::Utc;
use hub_core::events::CouponRedeemedEvent;
use hub_core::{
    generate_coupon_code, Coupon, DomainError, DomainEvent, EventChannel, Id, Page, PageRequest,
};
use tracing::{info, instrument, warn};

use crate::dto::{
    AssignCouponRequest, CouponResponse, IssueCouponRequest, LedgerEntryResponse,
    RedeemCouponRequest, RedeemCouponResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::member::MemberService;
use super::wallet::WalletService;

/// Attempts at inserting a batch before giving up on code collisions
const ISSUE_ATTEMPTS: usize = 3;

pub struct CouponService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CouponService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Codes are matched case-insensitively
    fn normalize_code(code: &str) -> String {
        code.trim().to_ascii_uppercase()
    }

    /// Issue `count` coupons, optionally bound to one member
    #[instrument(skip(self, request), fields(count = request.count))]
    pub async fn issue(
        &self,
        admin_id: Id,
        request: IssueCouponRequest,
    ) -> ServiceResult<Vec<CouponResponse>> {
        let now = Utc::now();
        if request.amount <= 0 {
            return Err(DomainError::InvalidAmount.into());
        }
        if request.expires_at <= now {
            return Err(ServiceError::validation("expires_at must be in the future"));
        }
        if request.count == 0 {
            return Err(ServiceError::validation("count must be at least 1"));
        }
        if let Some(member_id) = request.member_id {
            MemberService::new(self.ctx)
                .load(member_id)
                .await?
                .ensure_can_login()?;
        }

        for attempt in 1..=ISSUE_ATTEMPTS {
            let mut codes = HashSet::with_capacity(request.count as usize);
            while codes.len() < request.count as usize {
                codes.insert(generate_coupon_code());
            }

            let mut coupons = Vec::with_capacity(codes.len());
            for code in codes {
                let mut coupon = Coupon::new(
                    self.ctx.generate_id(),
                    code,
                    request.currency,
                    request.amount,
                    request.expires_at,
                );
                if let Some(member_id) = request.member_id {
                    coupon.assign(member_id, now)?;
                }
                coupons.push(coupon);
            }

            match self.ctx.coupon_repo().create_many(&coupons).await {
                Ok(()) => {
                    info!(
                        admin_id = %admin_id,
                        count = coupons.len(),
                        currency = request.currency.as_str(),
                        amount = request.amount,
                        "Coupons issued"
                    );
                    return Ok(coupons
                        .into_iter()
                        .map(|c| CouponResponse::at(c, now))
                        .collect());
                }
                Err(DomainError::CouponCodeExists) => {
                    warn!(attempt, "Coupon code collision, regenerating batch");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DomainError::CouponCodeExists.into())
    }

    #[instrument(skip(self, request))]
    pub async fn assign(
        &self,
        coupon_id: Id,
        request: AssignCouponRequest,
    ) -> ServiceResult<CouponResponse> {
        MemberService::new(self.ctx)
            .load(request.member_id)
            .await?
            .ensure_can_login()?;

        let now = Utc::now();
        let coupon = self
            .ctx
            .coupon_repo()
            .assign(coupon_id, request.member_id, now)
            .await?;

        info!(coupon_id = %coupon_id, member_id = %request.member_id, "Coupon assigned");
        Ok(CouponResponse::at(coupon, now))
    }

    /// Redeem a coupon and credit its value in one transaction
    #[instrument(skip(self, request))]
    pub async fn redeem(
        &self,
        member_id: Id,
        request: RedeemCouponRequest,
    ) -> ServiceResult<RedeemCouponResponse> {
        let code = Self::normalize_code(&request.code);
        if code.is_empty() {
            return Err(ServiceError::validation("Coupon code is required"));
        }
        MemberService::new(self.ctx)
            .load(member_id)
            .await?
            .ensure_can_login()?;

        let now = Utc::now();
        let (coupon, entry) = self
            .ctx
            .coupon_repo()
            .redeem(&code, member_id, self.ctx.generate_id(), now)
            .await?;

        WalletService::new(self.ctx).publish_change(&entry).await;
        self.ctx
            .publish(
                EventChannel::Member(member_id),
                DomainEvent::CouponRedeemed(CouponRedeemedEvent {
                    coupon_id: coupon.id,
                    member_id,
                    timestamp: now,
                }),
            )
            .await;

        info!(coupon_id = %coupon.id, member_id = %member_id, "Coupon redeemed");
        Ok(RedeemCouponResponse {
            coupon: CouponResponse::at(coupon, now),
            transaction: LedgerEntryResponse::from(entry),
        })
    }

    pub async fn my_coupons(&self, member_id: Id) -> ServiceResult<Vec<CouponResponse>> {
        let now = Utc::now();
        let coupons = self.ctx.coupon_repo().list_by_member(member_id).await?;
        Ok(coupons
            .into_iter()
            .map(|c| CouponResponse::at(c, now))
            .collect())
    }

    pub async fn list(&self, page: PageRequest) -> ServiceResult<Page<CouponResponse>> {
        let now = Utc::now();
        let coupons = self.ctx.coupon_repo().list(page).await?;
        Ok(coupons.map(|c| CouponResponse::at(c, now)))
    }
}
