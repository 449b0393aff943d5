//! Team chat handlers
//!
//! Rooms, membership and message history. Live delivery happens over the
//! `chat_room:{id}` Redis channel.

use axum::{extract::State, Json};
use hub_core::{Id, Page};
use hub_service::dto::{ChatMessageResponse, ChatRoomResponse, CreateRoomRequest, SendMessageRequest};
use hub_service::ChatService;
use serde::Deserialize;

use crate::extractors::{ApiQuery, AuthUser, IdPath, Pagination, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Cursor parameters for message history
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    /// Only messages older than this id
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl HistoryParams {
    fn before(&self) -> Result<Option<Id>, ApiError> {
        self.before
            .as_deref()
            .map(|raw| {
                raw.parse::<Id>()
                    .map_err(|_| ApiError::invalid_query("Invalid 'before' cursor format"))
            })
            .transpose()
    }
}

/// GET /chat/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    _auth: AuthUser,
    Pagination(page): Pagination,
) -> ApiResult<Json<Page<ChatRoomResponse>>> {
    let rooms = ChatService::new(state.service_context())
        .list_rooms(page)
        .await?;
    Ok(Json(rooms))
}

/// POST /chat/rooms
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<Created<Json<ChatRoomResponse>>> {
    let room = ChatService::new(state.service_context())
        .create_room(auth.member_id, request)
        .await?;
    Ok(Created(Json(room)))
}

/// GET /chat/rooms/mine
pub async fn my_rooms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ChatRoomResponse>>> {
    let rooms = ChatService::new(state.service_context())
        .my_rooms(auth.member_id)
        .await?;
    Ok(Json(rooms))
}

/// POST /chat/rooms/{room_id}/join
pub async fn join_room(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
) -> ApiResult<NoContent> {
    ChatService::new(state.service_context())
        .join(auth.member_id, room_id)
        .await?;
    Ok(NoContent)
}

/// POST /chat/rooms/{room_id}/leave
pub async fn leave_room(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
) -> ApiResult<NoContent> {
    ChatService::new(state.service_context())
        .leave(auth.member_id, room_id)
        .await?;
    Ok(NoContent)
}

/// GET /chat/rooms/{room_id}/messages?before=&limit=
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
    ApiQuery(params): ApiQuery<HistoryParams>,
) -> ApiResult<Json<Vec<ChatMessageResponse>>> {
    let before = params.before()?;
    let messages = ChatService::new(state.service_context())
        .history(auth.member_id, room_id, before, params.limit)
        .await?;
    Ok(Json(messages))
}

/// POST /chat/rooms/{room_id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<ChatMessageResponse>>> {
    let message = ChatService::new(state.service_context())
        .send_message(auth.member_id, room_id, request)
        .await?;
    Ok(Created(Json(message)))
}
