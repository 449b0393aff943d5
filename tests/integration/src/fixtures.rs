//! Test fixtures and data generators
//!
//! Request bodies serialize to what the API accepts; responses keep only the
//! fields the tests assert on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Per-run prefix so reruns against the same database do not collide
fn run_id() -> u64 {
    static RUN_ID: OnceLock<u64> = OnceLock::new();
    *RUN_ID.get_or_init(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() % 100_000)
            .unwrap_or_default()
    })
}

/// Get a unique suffix for test data
pub fn unique_suffix() -> String {
    format!("{}{}", run_id(), COUNTER.fetch_add(1, Ordering::SeqCst))
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

impl SignupRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            email: format!("Member{suffix}@Example.com"),
            password: "TestPass123!".to_string(),
            nickname: format!("m{suffix}"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_signup(signup: &SignupRequest) -> Self {
        Self {
            email: signup.email.clone(),
            password: signup.password.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OAuthLoginRequest {
    pub provider_id: String,
    pub email: String,
    pub nickname: Option<String>,
}

impl OAuthLoginRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            provider_id: format!("gh-{suffix}"),
            email: format!("social{suffix}@example.com"),
            nickname: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub member: MemberResponse,
}

#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    pub id: String,
    pub email: String,
    pub nickname: String,
    pub status: String,
    pub provider: String,
}

#[derive(Debug, Deserialize)]
pub struct MyPageResponse {
    pub member: MemberResponse,
    pub balances: BalanceResponse,
}

#[derive(Debug, Deserialize)]
pub struct NicknameCheckResponse {
    pub available: bool,
}

// ============================================================================
// Posts
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreatePostRequest {
    pub category: String,
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    pub fn study() -> Self {
        let suffix = unique_suffix();
        Self {
            category: "STUDY".to_string(),
            title: format!("Rust study group {suffix}"),
            content: "Weekly ownership and borrowing drills".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub category: String,
    pub title: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_id: Option<String>,
}

impl CreateCommentRequest {
    pub fn top_level(content: &str) -> Self {
        Self {
            content: content.to_string(),
            parent_id: None,
        }
    }

    pub fn reply(content: &str, parent_id: &str) -> Self {
        Self {
            content: content.to_string(),
            parent_id: Some(parent_id.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub parent_id: Option<String>,
    pub author_id: Option<String>,
    pub content: String,
    pub deleted: bool,
    #[serde(default)]
    pub replies: Vec<CommentResponse>,
}

/// Paged list envelope
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub max_members: i32,
}

impl CreateRoomRequest {
    pub fn with_capacity(max_members: i32) -> Self {
        let suffix = unique_suffix();
        Self {
            name: format!("team {suffix}"),
            max_members,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRoomResponse {
    pub id: String,
    pub owner_id: String,
    pub max_members: i32,
    pub member_count: i64,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessageResponse {
    pub id: String,
    pub sender_id: String,
    pub kind: String,
    pub content: String,
}

// ============================================================================
// Wallet
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    pub token: i64,
    pub ticket: i64,
}

#[derive(Debug, Serialize)]
pub struct ExchangeRequest {
    pub tickets: i64,
}

#[derive(Debug, Serialize)]
pub struct RedeemCouponRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateRoadmapRequest {
    pub topic: String,
    pub level: String,
    pub weeks: u32,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}
