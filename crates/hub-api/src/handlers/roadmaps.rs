//! Roadmap handlers
//!
//! Generating a roadmap spends tickets; reading and deleting are owner-only.

use axum::{extract::State, Json};
use hub_core::Page;
use hub_service::dto::{GenerateRoadmapRequest, RoadmapResponse};
use hub_service::RoadmapService;

use crate::extractors::{AuthUser, IdPath, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /roadmaps
pub async fn generate_roadmap(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<GenerateRoadmapRequest>,
) -> ApiResult<Created<Json<RoadmapResponse>>> {
    let roadmap = RoadmapService::new(state.service_context())
        .generate(auth.member_id, request)
        .await?;
    Ok(Created(Json(roadmap)))
}

/// GET /roadmaps
pub async fn list_roadmaps(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
) -> ApiResult<Json<Page<RoadmapResponse>>> {
    let roadmaps = RoadmapService::new(state.service_context())
        .list_mine(auth.member_id, page)
        .await?;
    Ok(Json(roadmaps))
}

/// GET /roadmaps/{roadmap_id}
pub async fn get_roadmap(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(roadmap_id): IdPath,
) -> ApiResult<Json<RoadmapResponse>> {
    let roadmap = RoadmapService::new(state.service_context())
        .get(auth.member_id, roadmap_id)
        .await?;
    Ok(Json(roadmap))
}

/// DELETE /roadmaps/{roadmap_id}
pub async fn delete_roadmap(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(roadmap_id): IdPath,
) -> ApiResult<NoContent> {
    RoadmapService::new(state.service_context())
        .delete(auth.member_id, roadmap_id)
        .await?;
    Ok(NoContent)
}
