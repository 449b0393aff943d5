//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Ids serialize as strings so JavaScript clients never lose precision.

use chrono::{DateTime, Utc};
use hub_core::{
    Currency, CouponState, Id, LedgerReason, MemberStatus, MessageKind, OAuthProvider,
    PostCategory, RoadmapLevel, RoadmapStep, Roles,
};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
    pub member: MemberResponse,
}

// ============================================================================
// Member Responses
// ============================================================================

/// Full member view, shown to the member themself and to admins
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: Id,
    pub email: String,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub status: MemberStatus,
    pub roles: Roles,
    pub provider: OAuthProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What other members may see
#[derive(Debug, Clone, Serialize)]
pub struct PublicMemberResponse {
    pub id: Id,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// My page: profile plus wallet balances
#[derive(Debug, Serialize)]
pub struct MyPageResponse {
    #[serde(flatten)]
    pub member: MemberResponse,
    pub balances: BalanceResponse,
}

#[derive(Debug, Serialize)]
pub struct NicknameCheckResponse {
    pub nickname: String,
    pub available: bool,
}

// ============================================================================
// Post Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: Id,
    pub author_id: Id,
    pub author_nickname: String,
    pub category: PostCategory,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    /// Whether the viewer liked the post; only on detail reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub post_id: Id,
    pub liked: bool,
    pub like_count: i64,
}

// ============================================================================
// Comment Responses
// ============================================================================

/// A comment in a post's thread. Deleted comments kept for their replies
/// carry placeholder content and no author.
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: Id,
    pub post_id: Id,
    pub parent_id: Option<Id>,
    pub author_id: Option<Id>,
    pub author_nickname: Option<String>,
    pub content: String,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<CommentResponse>,
}

/// A comment listed on the author's own page
#[derive(Debug, Clone, Serialize)]
pub struct MyCommentResponse {
    pub id: Id,
    pub post_id: Id,
    pub parent_id: Option<Id>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Chat Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatRoomResponse {
    pub id: Id,
    pub name: String,
    pub owner_id: Id,
    pub max_members: i32,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageResponse {
    pub id: Id,
    pub room_id: Id,
    pub sender_id: Id,
    pub kind: MessageKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Coupon Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CouponResponse {
    pub id: Id,
    pub code: String,
    pub currency: Currency,
    pub amount: i64,
    pub state: CouponState,
    pub member_id: Option<Id>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RedeemCouponResponse {
    pub coupon: CouponResponse,
    pub transaction: LedgerEntryResponse,
}

// ============================================================================
// Wallet Responses
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BalanceResponse {
    pub token: i64,
    pub ticket: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntryResponse {
    pub id: Id,
    pub member_id: Id,
    pub currency: Currency,
    pub amount: i64,
    pub balance_after: i64,
    pub reason: LedgerReason,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ExchangeResponse {
    pub tokens_spent: i64,
    pub tickets_received: i64,
    pub balances: BalanceResponse,
}

// ============================================================================
// Roadmap Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapResponse {
    pub id: Id,
    pub member_id: Id,
    pub topic: String,
    pub level: RoadmapLevel,
    pub weeks: i32,
    pub steps: Vec<RoadmapStep>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let label = |healthy: bool| if healthy { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if database_healthy && redis_healthy {
                "ready"
            } else {
                "not_ready"
            }
            .to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: label(database_healthy),
                redis: label(redis_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
