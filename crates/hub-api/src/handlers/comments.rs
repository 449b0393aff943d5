//! Comment handlers
//!
//! Threaded comments under a post; replies go one level deep.

use axum::{extract::State, Json};
use hub_service::dto::{
    CommentResponse, CreateCommentRequest, MyCommentResponse, UpdateCommentRequest,
};
use hub_service::CommentService;

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /posts/{post_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    IdPath(post_id): IdPath,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let comments = CommentService::new(state.service_context())
        .list(post_id)
        .await?;
    Ok(Json(comments))
}

/// POST /posts/{post_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<MyCommentResponse>>> {
    let comment = CommentService::new(state.service_context())
        .create(auth.member_id, post_id, request)
        .await?;
    Ok(Created(Json(comment)))
}

/// PATCH /comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(comment_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<MyCommentResponse>> {
    let comment = CommentService::new(state.service_context())
        .update(auth.member_id, comment_id, request)
        .await?;
    Ok(Json(comment))
}

/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(comment_id): IdPath,
) -> ApiResult<NoContent> {
    CommentService::new(state.service_context())
        .delete(auth.member_id, comment_id)
        .await?;
    Ok(NoContent)
}
