//! Post handlers
//!
//! Board listing, reading, writing, editing and deleting posts.

use axum::{extract::State, Json};
use hub_core::{Page, PostCategory, PostQuery};
use hub_service::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};
use hub_service::PostService;
use serde::Deserialize;

use crate::extractors::{ApiQuery, AuthUser, IdPath, OptionalAuthUser, Pagination, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Board filters; `category` is case-insensitive
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
}

impl TryFrom<PostListParams> for PostQuery {
    type Error = ApiError;

    fn try_from(params: PostListParams) -> Result<Self, Self::Error> {
        let category = params
            .category
            .filter(|c| !c.trim().is_empty())
            .map(|c| {
                PostCategory::parse(c.trim())
                    .ok_or_else(|| ApiError::invalid_query(format!("Unknown category: {c}")))
            })
            .transpose()?;

        Ok(PostQuery {
            category,
            keyword: params.keyword,
            author_id: None,
        })
    }
}

/// GET /posts
pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PostListParams>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Page<PostResponse>>> {
    let query = PostQuery::try_from(params)?;
    let posts = PostService::new(state.service_context())
        .list(query, page)
        .await?;
    Ok(Json(posts))
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<Json<PostResponse>>> {
    let post = PostService::new(state.service_context())
        .create(auth.member_id, request)
        .await?;
    Ok(Created(Json(post)))
}

/// Read a post; counts a view and reports whether the viewer liked it
///
/// GET /posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<Json<PostResponse>> {
    let post = PostService::new(state.service_context())
        .get(post_id, viewer.member_id())
        .await?;
    Ok(Json(post))
}

/// PATCH /posts/{post_id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let post = PostService::new(state.service_context())
        .update(auth.member_id, post_id, request)
        .await?;
    Ok(Json(post))
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<NoContent> {
    PostService::new(state.service_context())
        .delete(auth.member_id, post_id)
        .await?;
    Ok(NoContent)
}
