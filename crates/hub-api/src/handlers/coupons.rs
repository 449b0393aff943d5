//! Coupon handlers for members

use axum::{extract::State, Json};
use hub_service::dto::{CouponResponse, RedeemCouponRequest, RedeemCouponResponse};
use hub_service::CouponService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Redeem a coupon code and credit its value
///
/// POST /coupons/redeem
pub async fn redeem_coupon(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<RedeemCouponRequest>,
) -> ApiResult<Json<RedeemCouponResponse>> {
    let response = CouponService::new(state.service_context())
        .redeem(auth.member_id, request)
        .await?;
    Ok(Json(response))
}

/// GET /coupons/me
pub async fn my_coupons(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<CouponResponse>>> {
    let coupons = CouponService::new(state.service_context())
        .my_coupons(auth.member_id)
        .await?;
    Ok(Json(coupons))
}
