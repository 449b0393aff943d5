//! Chat models -> entities

use hub_core::entities::{ChatMessage, ChatRoom, ChatRoomView, MessageKind};
use hub_core::error::DomainError;
use hub_core::value_objects::Id;

use super::parse_column;
use crate::models::{ChatMessageModel, ChatRoomModel, ChatRoomViewModel};

impl From<ChatRoomModel> for ChatRoom {
    fn from(model: ChatRoomModel) -> Self {
        ChatRoom {
            id: Id::new(model.id),
            name: model.name,
            owner_id: Id::new(model.owner_id),
            max_members: model.max_members,
            created_at: model.created_at,
            deleted_at: model.deleted_at,
        }
    }
}

impl TryFrom<ChatRoomViewModel> for ChatRoomView {
    type Error = DomainError;

    fn try_from(model: ChatRoomViewModel) -> Result<Self, Self::Error> {
        Ok(ChatRoomView {
            room: ChatRoom::from(model.room),
            member_count: model.member_count,
        })
    }
}

impl TryFrom<ChatMessageModel> for ChatMessage {
    type Error = DomainError;

    fn try_from(model: ChatMessageModel) -> Result<Self, Self::Error> {
        Ok(ChatMessage {
            id: Id::new(model.id),
            room_id: Id::new(model.room_id),
            sender_id: Id::new(model.sender_id),
            kind: parse_column("kind", &model.kind, MessageKind::parse)?,
            content: model.content,
            created_at: model.created_at,
        })
    }
}
