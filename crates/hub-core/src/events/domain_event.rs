//! Domain events - published to subscribers when state changes
//!
//! Chat events feed realtime relays; wallet events let clients refresh
//! balances without polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Currency, LedgerReason, MessageKind};
use crate::value_objects::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Chat Events
    // =========================================================================
    ChatMessageCreated(ChatMessageCreatedEvent),
    ChatRoomClosed(ChatRoomClosedEvent),

    // =========================================================================
    // Wallet Events
    // =========================================================================
    BalanceChanged(BalanceChangedEvent),
    CouponRedeemed(CouponRedeemedEvent),

    // =========================================================================
    // Roadmap Events
    // =========================================================================
    RoadmapGenerated(RoadmapGeneratedEvent),
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ChatMessageCreated(_) => "CHAT_MESSAGE_CREATED",
            Self::ChatRoomClosed(_) => "CHAT_ROOM_CLOSED",
            Self::BalanceChanged(_) => "BALANCE_CHANGED",
            Self::CouponRedeemed(_) => "COUPON_REDEEMED",
            Self::RoadmapGenerated(_) => "ROADMAP_GENERATED",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ChatMessageCreated(e) => e.timestamp,
            Self::ChatRoomClosed(e) => e.timestamp,
            Self::BalanceChanged(e) => e.timestamp,
            Self::CouponRedeemed(e) => e.timestamp,
            Self::RoadmapGenerated(e) => e.timestamp,
        }
    }
}

/// Where an event is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventChannel {
    ChatRoom(Id),
    Member(Id),
}

impl EventChannel {
    pub fn name(&self) -> String {
        match self {
            Self::ChatRoom(id) => format!("chat_room:{id}"),
            Self::Member(id) => format!("member:{id}"),
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageCreatedEvent {
    pub message_id: Id,
    pub room_id: Id,
    pub sender_id: Id,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRoomClosedEvent {
    pub room_id: Id,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceChangedEvent {
    pub member_id: Id,
    pub currency: Currency,
    pub amount: i64,
    pub balance: i64,
    pub reason: LedgerReason,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponRedeemedEvent {
    pub coupon_id: Id,
    pub member_id: Id,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapGeneratedEvent {
    pub roadmap_id: Id,
    pub member_id: Id,
    pub timestamp: DateTime<Utc>,
}
