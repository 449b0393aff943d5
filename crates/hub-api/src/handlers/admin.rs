//! Admin handlers
//!
//! Every endpoint here requires an ACTIVE member with the ADMIN role,
//! enforced by the [`AdminUser`] extractor.

use axum::{extract::State, Json};
use chrono::Utc;
use hub_core::{MemberStatus, Page};
use hub_service::dto::{
    AdjustBalanceRequest, AssignCouponRequest, ChangeRolesRequest, ChangeStatusRequest,
    CouponResponse, IssueCouponRequest, LedgerEntryResponse, MemberResponse,
};
use hub_service::{AdminService, CouponService, DistributionReport, WalletService};
use serde::Deserialize;
use tracing::info;

use super::wallet::HistoryParams;
use crate::extractors::{AdminUser, ApiQuery, IdPath, Pagination, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MemberListParams {
    #[serde(default)]
    pub status: Option<String>,
}

impl MemberListParams {
    fn status(&self) -> Result<Option<MemberStatus>, ApiError> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                MemberStatus::parse(s)
                    .ok_or_else(|| ApiError::invalid_query(format!("Unknown status: {s}")))
            })
            .transpose()
    }
}

// === Members ===

/// GET /admin/members?status=&page=&size=
pub async fn list_members(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiQuery(params): ApiQuery<MemberListParams>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Page<MemberResponse>>> {
    let members = AdminService::new(state.service_context())
        .list_members(params.status()?, page)
        .await?;
    Ok(Json(members))
}

/// PATCH /admin/members/{member_id}/status
pub async fn change_status(
    State(state): State<AppState>,
    admin: AdminUser,
    IdPath(member_id): IdPath,
    ValidatedJson(request): ValidatedJson<ChangeStatusRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let member = AdminService::new(state.service_context())
        .change_status(admin.member_id, member_id, request)
        .await?;
    Ok(Json(member))
}

/// PUT /admin/members/{member_id}/roles
pub async fn change_roles(
    State(state): State<AppState>,
    admin: AdminUser,
    IdPath(member_id): IdPath,
    ValidatedJson(request): ValidatedJson<ChangeRolesRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let member = AdminService::new(state.service_context())
        .change_roles(admin.member_id, member_id, request)
        .await?;
    Ok(Json(member))
}

// === Coupons ===

/// POST /admin/coupons
pub async fn issue_coupons(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedJson(request): ValidatedJson<IssueCouponRequest>,
) -> ApiResult<Created<Json<Vec<CouponResponse>>>> {
    let coupons = CouponService::new(state.service_context())
        .issue(admin.member_id, request)
        .await?;
    Ok(Created(Json(coupons)))
}

/// GET /admin/coupons
pub async fn list_coupons(
    State(state): State<AppState>,
    _admin: AdminUser,
    Pagination(page): Pagination,
) -> ApiResult<Json<Page<CouponResponse>>> {
    let coupons = CouponService::new(state.service_context())
        .list(page)
        .await?;
    Ok(Json(coupons))
}

/// POST /admin/coupons/{coupon_id}/assign
pub async fn assign_coupon(
    State(state): State<AppState>,
    _admin: AdminUser,
    IdPath(coupon_id): IdPath,
    ValidatedJson(request): ValidatedJson<AssignCouponRequest>,
) -> ApiResult<Json<CouponResponse>> {
    let coupon = CouponService::new(state.service_context())
        .assign(coupon_id, request)
        .await?;
    Ok(Json(coupon))
}

// === Wallet ===

/// POST /admin/wallet/grant
pub async fn grant(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedJson(request): ValidatedJson<AdjustBalanceRequest>,
) -> ApiResult<Created<Json<LedgerEntryResponse>>> {
    let entry = WalletService::new(state.service_context())
        .grant(admin.member_id, request)
        .await?;
    Ok(Created(Json(entry)))
}

/// POST /admin/wallet/deduct
pub async fn deduct(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedJson(request): ValidatedJson<AdjustBalanceRequest>,
) -> ApiResult<Created<Json<LedgerEntryResponse>>> {
    let entry = WalletService::new(state.service_context())
        .deduct(admin.member_id, request)
        .await?;
    Ok(Created(Json(entry)))
}

/// GET /admin/wallet/{member_id}/transactions
pub async fn member_transactions(
    State(state): State<AppState>,
    _admin: AdminUser,
    IdPath(member_id): IdPath,
    ApiQuery(params): ApiQuery<HistoryParams>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Page<LedgerEntryResponse>>> {
    let history = WalletService::new(state.service_context())
        .history(member_id, params.currency()?, page)
        .await?;
    Ok(Json(history))
}

/// Run the weekly ticket distribution now; already-granted members are skipped
///
/// POST /admin/distributions/weekly
pub async fn run_weekly_distribution(
    State(state): State<AppState>,
    admin: AdminUser,
) -> ApiResult<Json<DistributionReport>> {
    info!(admin_id = %admin.member_id, "Manual weekly distribution requested");
    let report = WalletService::new(state.service_context())
        .distribute_weekly(Utc::now())
        .await?;
    Ok(Json(report))
}

// === Posts ===

/// DELETE /admin/posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    admin: AdminUser,
    IdPath(post_id): IdPath,
) -> ApiResult<NoContent> {
    AdminService::new(state.service_context())
        .delete_post(admin.member_id, post_id)
        .await?;
    Ok(NoContent)
}
