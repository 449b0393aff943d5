//! Like handlers

use axum::{extract::State, Json};
use hub_service::dto::LikeResponse;
use hub_service::LikeService;

use crate::extractors::{AuthUser, IdPath};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// POST /posts/{post_id}/likes
pub async fn like_post(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<Created<Json<LikeResponse>>> {
    let response = LikeService::new(state.service_context())
        .like(auth.member_id, post_id)
        .await?;
    Ok(Created(Json(response)))
}

/// DELETE /posts/{post_id}/likes
pub async fn unlike_post(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<Json<LikeResponse>> {
    let response = LikeService::new(state.service_context())
        .unlike(auth.member_id, post_id)
        .await?;
    Ok(Json(response))
}
