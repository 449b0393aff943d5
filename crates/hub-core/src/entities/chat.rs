//! Team chat rooms, their membership, and messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoom {
    pub id: Id,
    pub name: String,
    pub owner_id: Id,
    pub max_members: i32,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ChatRoom {
    pub const MIN_MEMBERS: i32 = 2;
    pub const MAX_MEMBERS: i32 = 100;

    pub fn new(id: Id, name: String, owner_id: Id, max_members: i32) -> Self {
        Self {
            id,
            name,
            owner_id,
            max_members,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[inline]
    pub fn is_owner(&self, member_id: Id) -> bool {
        self.owner_id == member_id
    }

    /// Outcome of `leaver` departing, given the longest-standing member
    /// still in the room afterwards
    pub fn departure(&self, leaver: Id, next: Option<Id>) -> RoomDeparture {
        match next {
            None => RoomDeparture::Closed,
            Some(next) if self.is_owner(leaver) => RoomDeparture::OwnerTransferred(next),
            Some(_) => RoomDeparture::Left,
        }
    }

    /// Fails when another member would exceed capacity
    pub fn ensure_capacity(&self, current_members: i64) -> Result<(), DomainError> {
        if current_members >= i64::from(self.max_members) {
            Err(DomainError::ChatRoomFull)
        } else {
            Ok(())
        }
    }
}

/// What a member leaving did to the room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomDeparture {
    Left,
    /// The owner left and this member took over
    OwnerTransferred(Id),
    /// The last member left
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoomView {
    pub room: ChatRoom,
    pub member_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatRoomMember {
    pub room_id: Id,
    pub member_id: Id,
    pub joined_at: DateTime<Utc>,
}

impl ChatRoomMember {
    pub fn new(room_id: Id, member_id: Id) -> Self {
        Self {
            room_id,
            member_id,
            joined_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    Talk,
    Enter,
    Leave,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Talk => "TALK",
            Self::Enter => "ENTER",
            Self::Leave => "LEAVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TALK" => Some(Self::Talk),
            "ENTER" => Some(Self::Enter),
            "LEAVE" => Some(Self::Leave),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Id,
    pub room_id: Id,
    pub sender_id: Id,
    pub kind: MessageKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub const MAX_CONTENT_LENGTH: usize = 1000;

    pub fn talk(id: Id, room_id: Id, sender_id: Id, content: String) -> Self {
        Self {
            id,
            room_id,
            sender_id,
            kind: MessageKind::Talk,
            content,
            created_at: Utc::now(),
        }
    }

    /// System notice written when someone joins or leaves
    pub fn notice(id: Id, room_id: Id, member_id: Id, nickname: &str, kind: MessageKind) -> Self {
        let content = match kind {
            MessageKind::Enter => format!("{nickname} joined the room"),
            MessageKind::Leave => format!("{nickname} left the room"),
            MessageKind::Talk => String::new(),
        };
        Self {
            id,
            room_id,
            sender_id: member_id,
            kind,
            content,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity() {
        let room = ChatRoom::new(Id::new(1), "rust".into(), Id::new(9), 3);
        assert!(room.ensure_capacity(2).is_ok());
        assert!(matches!(room.ensure_capacity(3), Err(DomainError::ChatRoomFull)));
    }

    #[test]
    fn test_departure() {
        let room = ChatRoom::new(Id::new(1), "rust".into(), Id::new(9), 3);
        assert_eq!(room.departure(Id::new(9), None), RoomDeparture::Closed);
        assert_eq!(
            room.departure(Id::new(9), Some(Id::new(4))),
            RoomDeparture::OwnerTransferred(Id::new(4))
        );
        assert_eq!(room.departure(Id::new(4), Some(Id::new(9))), RoomDeparture::Left);
    }

    #[test]
    fn test_notice_content() {
        let enter = ChatMessage::notice(Id::new(1), Id::new(2), Id::new(3), "neo", MessageKind::Enter);
        assert_eq!(enter.content, "neo joined the room");
        assert_eq!(enter.kind, MessageKind::Enter);

        let leave = ChatMessage::notice(Id::new(4), Id::new(2), Id::new(3), "neo", MessageKind::Leave);
        assert_eq!(leave.content, "neo left the room");
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(MessageKind::parse("TALK"), Some(MessageKind::Talk));
        assert_eq!(MessageKind::parse("talk"), None);
    }
}
