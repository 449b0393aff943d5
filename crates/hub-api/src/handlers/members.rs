//! Member handlers
//!
//! My page, profile edits, password change, withdrawal and public profiles.

use axum::{extract::State, Json};
use axum_extra::extract::CookieJar;
use hub_core::Page;
use hub_service::dto::{
    ChangePasswordRequest, MemberResponse, MyCommentResponse, MyPageResponse,
    NicknameCheckResponse, PostResponse, PublicMemberResponse, UpdateProfileRequest,
    WithdrawRequest,
};
use hub_service::MemberService;
use serde::Deserialize;

use super::auth::clear_token_cookies;
use crate::extractors::{
    ApiQuery, AuthUser, IdPath, OptionalValidatedJson, Pagination, ValidatedJson,
};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NicknameQuery {
    pub nickname: String,
}

/// GET /members/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MyPageResponse>> {
    let response = MemberService::new(state.service_context())
        .get_me(auth.member_id)
        .await?;
    Ok(Json(response))
}

/// PATCH /members/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let response = MemberService::new(state.service_context())
        .update_profile(auth.member_id, request)
        .await?;
    Ok(Json(response))
}

/// Withdraw the account; local accounts confirm with their password
///
/// DELETE /members/me
pub async fn withdraw(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    OptionalValidatedJson(request): OptionalValidatedJson<WithdrawRequest>,
) -> ApiResult<(CookieJar, NoContent)> {
    MemberService::new(state.service_context())
        .withdraw(auth.member_id, request.unwrap_or_default())
        .await?;

    Ok((clear_token_cookies(&state, jar), NoContent))
}

/// PUT /members/me/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<NoContent> {
    MemberService::new(state.service_context())
        .change_password(auth.member_id, request)
        .await?;
    Ok(NoContent)
}

/// GET /members/me/posts
pub async fn my_posts(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
) -> ApiResult<Json<Page<PostResponse>>> {
    let posts = MemberService::new(state.service_context())
        .my_posts(auth.member_id, page)
        .await?;
    Ok(Json(posts))
}

/// GET /members/me/comments
pub async fn my_comments(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
) -> ApiResult<Json<Page<MyCommentResponse>>> {
    let comments = MemberService::new(state.service_context())
        .my_comments(auth.member_id, page)
        .await?;
    Ok(Json(comments))
}

/// GET /members/me/likes
pub async fn my_likes(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
) -> ApiResult<Json<Page<PostResponse>>> {
    let posts = MemberService::new(state.service_context())
        .my_liked_posts(auth.member_id, page)
        .await?;
    Ok(Json(posts))
}

/// GET /members/nickname-check?nickname=
pub async fn check_nickname(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NicknameQuery>,
) -> ApiResult<Json<NicknameCheckResponse>> {
    let response = MemberService::new(state.service_context())
        .check_nickname(&query.nickname)
        .await?;
    Ok(Json(response))
}

/// GET /members/{member_id}
pub async fn get_member(
    State(state): State<AppState>,
    IdPath(member_id): IdPath,
) -> ApiResult<Json<PublicMemberResponse>> {
    let response = MemberService::new(state.service_context())
        .get_member(member_id)
        .await?;
    Ok(Json(response))
}
