//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hub_core::{
    Account, ChatMessage, ChatRoomView, Comment, CommentView, Coupon, Currency, Id, LedgerEntry,
    Member, PostView, Roadmap,
};

use super::responses::{
    BalanceResponse, ChatMessageResponse, ChatRoomResponse, CommentResponse, CouponResponse,
    LedgerEntryResponse, MemberResponse, MyCommentResponse, PostResponse, PublicMemberResponse,
    RoadmapResponse,
};

// ============================================================================
// Member Mappers
// ============================================================================

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            email: member.email.clone(),
            nickname: member.nickname.clone(),
            profile_image: member.profile_image.clone(),
            status: member.status,
            roles: member.roles,
            provider: member.provider,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

impl From<&Member> for PublicMemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            nickname: member.nickname.clone(),
            profile_image: member.profile_image.clone(),
            created_at: member.created_at,
        }
    }
}

// ============================================================================
// Post Mappers
// ============================================================================

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        let post = view.post;
        Self {
            id: post.id,
            author_id: post.author_id,
            author_nickname: view.author_nickname,
            category: post.category,
            title: post.title,
            content: post.content,
            view_count: post.view_count,
            like_count: view.like_count,
            comment_count: view.comment_count,
            liked: None,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl From<&Comment> for MyCommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            content: comment.content.clone(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

impl CommentResponse {
    fn live(view: CommentView) -> Self {
        let comment = view.comment;
        Self {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            author_id: Some(comment.author_id),
            author_nickname: Some(view.author_nickname),
            content: comment.content,
            deleted: false,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            replies: Vec::new(),
        }
    }

    fn placeholder(view: CommentView) -> Self {
        let comment = view.comment;
        Self {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            author_id: None,
            author_nickname: None,
            content: Comment::DELETED_PLACEHOLDER.to_string(),
            deleted: true,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            replies: Vec::new(),
        }
    }
}

/// Arrange a post's comments (oldest first) into a two-level thread.
///
/// Deleted replies are dropped. A deleted top-level comment survives as a
/// placeholder only while it still has live replies.
pub fn build_comment_thread(views: Vec<CommentView>) -> Vec<CommentResponse> {
    let mut replies: HashMap<Id, Vec<CommentResponse>> = HashMap::new();
    let mut roots = Vec::new();

    for view in views {
        match view.comment.parent_id {
            Some(parent_id) => {
                if !view.comment.is_deleted() {
                    replies
                        .entry(parent_id)
                        .or_default()
                        .push(CommentResponse::live(view));
                }
            }
            None => roots.push(view),
        }
    }

    roots
        .into_iter()
        .filter_map(|view| {
            let children = replies.remove(&view.comment.id).unwrap_or_default();
            let mut node = if view.comment.is_deleted() {
                if children.is_empty() {
                    return None;
                }
                CommentResponse::placeholder(view)
            } else {
                CommentResponse::live(view)
            };
            node.replies = children;
            Some(node)
        })
        .collect()
}

// ============================================================================
// Chat Mappers
// ============================================================================

impl From<ChatRoomView> for ChatRoomResponse {
    fn from(view: ChatRoomView) -> Self {
        let room = view.room;
        Self {
            id: room.id,
            name: room.name,
            owner_id: room.owner_id,
            max_members: room.max_members,
            member_count: view.member_count,
            created_at: room.created_at,
        }
    }
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            room_id: message.room_id,
            sender_id: message.sender_id,
            kind: message.kind,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

// ============================================================================
// Coupon Mappers
// ============================================================================

impl CouponResponse {
    /// State is evaluated at `now`, so an unused coupon can read as EXPIRED
    pub fn at(coupon: Coupon, now: DateTime<Utc>) -> Self {
        Self {
            state: coupon.state(now),
            id: coupon.id,
            code: coupon.code,
            currency: coupon.currency,
            amount: coupon.amount,
            member_id: coupon.member_id,
            expires_at: coupon.expires_at,
            used_at: coupon.used_at,
            created_at: coupon.created_at,
        }
    }
}

// ============================================================================
// Wallet Mappers
// ============================================================================

impl From<LedgerEntry> for LedgerEntryResponse {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id,
            member_id: entry.member_id,
            currency: entry.currency,
            amount: entry.amount,
            balance_after: entry.balance_after,
            reason: entry.reason,
            reference: entry.reference,
            created_at: entry.created_at,
        }
    }
}

impl From<&[Account]> for BalanceResponse {
    fn from(accounts: &[Account]) -> Self {
        accounts
            .iter()
            .fold(Self::default(), |mut acc, account| {
                match account.currency {
                    Currency::Token => acc.token = account.balance,
                    Currency::Ticket => acc.ticket = account.balance,
                }
                acc
            })
    }
}

// ============================================================================
// Roadmap Mappers
// ============================================================================

impl From<Roadmap> for RoadmapResponse {
    fn from(roadmap: Roadmap) -> Self {
        Self {
            id: roadmap.id,
            member_id: roadmap.member_id,
            topic: roadmap.topic,
            level: roadmap.level,
            weeks: roadmap.weeks,
            steps: roadmap.steps,
            created_at: roadmap.created_at,
        }
    }
}
