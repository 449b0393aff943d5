//! Chat service - team rooms, membership and message history
//!
//! Every persisted message (talk, enter and leave notices) is also published
//! on the room's event channel so realtime relays can fan it out.

use chrono::Utc;
use hub_core::events::{ChatMessageCreatedEvent, ChatRoomClosedEvent};
use hub_core::{
    ChatMessage, ChatRoom, ChatRoomMember, DomainError, DomainEvent, EventChannel, Id,
    MessageKind, Page, PageRequest, RoomDeparture,
};
use tracing::{info, instrument};

use crate::dto::{ChatMessageResponse, ChatRoomResponse, CreateRoomRequest, SendMessageRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::member::MemberService;

/// Default and maximum page of history
const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 100;

pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn load_room(&self, room_id: Id) -> ServiceResult<ChatRoom> {
        self.ctx
            .chat_repo()
            .find_room(room_id)
            .await?
            .ok_or_else(|| DomainError::ChatRoomNotFound(room_id).into())
    }

    async fn ensure_member(&self, room_id: Id, member_id: Id) -> ServiceResult<()> {
        if self.ctx.chat_repo().is_member(room_id, member_id).await? {
            Ok(())
        } else {
            Err(DomainError::NotRoomMember.into())
        }
    }

    /// Persist a message and fan it out to the room
    async fn post_message(&self, message: ChatMessage) -> ServiceResult<ChatMessageResponse> {
        self.ctx.chat_repo().save_message(&message).await?;

        let event = DomainEvent::ChatMessageCreated(ChatMessageCreatedEvent {
            message_id: message.id,
            room_id: message.room_id,
            sender_id: message.sender_id,
            kind: message.kind,
            content: message.content.clone(),
            timestamp: message.created_at,
        });
        self.ctx
            .publish(EventChannel::ChatRoom(message.room_id), event)
            .await;

        Ok(ChatMessageResponse::from(message))
    }

    async fn notice(&self, room_id: Id, member_id: Id, kind: MessageKind) -> ServiceResult<()> {
        let nickname = MemberService::new(self.ctx).load(member_id).await?.nickname;
        let message = ChatMessage::notice(self.ctx.generate_id(), room_id, member_id, &nickname, kind);
        self.post_message(message).await.map(|_| ())
    }

    /// Open a room; the creator becomes its owner and first member
    #[instrument(skip(self, request))]
    pub async fn create_room(
        &self,
        owner_id: Id,
        request: CreateRoomRequest,
    ) -> ServiceResult<ChatRoomResponse> {
        if !(ChatRoom::MIN_MEMBERS..=ChatRoom::MAX_MEMBERS).contains(&request.max_members) {
            return Err(ServiceError::validation(format!(
                "Room capacity must be {}-{}",
                ChatRoom::MIN_MEMBERS,
                ChatRoom::MAX_MEMBERS
            )));
        }
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::validation("Room name must not be blank"));
        }

        let room = ChatRoom::new(self.ctx.generate_id(), name, owner_id, request.max_members);
        self.ctx.chat_repo().create_room(&room).await?;

        info!(room_id = %room.id, owner_id = %owner_id, "Chat room created");
        Ok(ChatRoomResponse {
            id: room.id,
            name: room.name,
            owner_id,
            max_members: room.max_members,
            member_count: 1,
            created_at: room.created_at,
        })
    }

    pub async fn list_rooms(&self, page: PageRequest) -> ServiceResult<Page<ChatRoomResponse>> {
        let rooms = self.ctx.chat_repo().list_rooms(page).await?;
        Ok(rooms.map(ChatRoomResponse::from))
    }

    pub async fn my_rooms(&self, member_id: Id) -> ServiceResult<Vec<ChatRoomResponse>> {
        let rooms = self.ctx.chat_repo().list_rooms_of(member_id).await?;
        Ok(rooms.into_iter().map(ChatRoomResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn join(&self, member_id: Id, room_id: Id) -> ServiceResult<()> {
        self.load_room(room_id).await?;
        self.ctx
            .chat_repo()
            .join(&ChatRoomMember::new(room_id, member_id))
            .await?;

        info!(room_id = %room_id, member_id = %member_id, "Member joined room");
        self.notice(room_id, member_id, MessageKind::Enter).await
    }

    /// Leave a room. The last member out closes it; an owner leaving hands
    /// the room to the longest-standing member.
    #[instrument(skip(self))]
    pub async fn leave(&self, member_id: Id, room_id: Id) -> ServiceResult<()> {
        let departure = self.ctx.chat_repo().leave(room_id, member_id).await?;
        self.notice(room_id, member_id, MessageKind::Leave).await?;

        match departure {
            RoomDeparture::Closed => {
                self.ctx
                    .publish(
                        EventChannel::ChatRoom(room_id),
                        DomainEvent::ChatRoomClosed(ChatRoomClosedEvent {
                            room_id,
                            timestamp: Utc::now(),
                        }),
                    )
                    .await;
                info!(room_id = %room_id, "Chat room closed");
            }
            RoomDeparture::OwnerTransferred(owner_id) => {
                info!(room_id = %room_id, owner_id = %owner_id, "Room ownership transferred");
            }
            RoomDeparture::Left => {
                info!(room_id = %room_id, member_id = %member_id, "Member left room");
            }
        }
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn send_message(
        &self,
        sender_id: Id,
        room_id: Id,
        request: SendMessageRequest,
    ) -> ServiceResult<ChatMessageResponse> {
        self.load_room(room_id).await?;
        self.ensure_member(room_id, sender_id).await?;

        if request.content.trim().is_empty() {
            return Err(ServiceError::validation("Message must not be blank"));
        }
        if request.content.chars().count() > ChatMessage::MAX_CONTENT_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: ChatMessage::MAX_CONTENT_LENGTH,
            }
            .into());
        }

        let message = ChatMessage::talk(self.ctx.generate_id(), room_id, sender_id, request.content);
        self.post_message(message).await
    }

    /// Messages before `before`, newest first
    pub async fn history(
        &self,
        member_id: Id,
        room_id: Id,
        before: Option<Id>,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<ChatMessageResponse>> {
        self.load_room(room_id).await?;
        self.ensure_member(room_id, member_id).await?;

        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        let messages = self.ctx.chat_repo().messages(room_id, before, limit).await?;
        Ok(messages.into_iter().map(ChatMessageResponse::from).collect())
    }
}
