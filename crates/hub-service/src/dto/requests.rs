//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use chrono::{DateTime, Utc};
use hub_core::{Currency, Id, MemberStatus, PostCategory, RoadmapLevel, Roles};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 20, message = "Nickname must be 2-20 characters"))]
    pub nickname: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request; the token may instead arrive as a cookie
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

/// Logout request (optional refresh token to revoke; none revokes all)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Profile already verified by the social provider
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OAuthLoginRequest {
    #[validate(length(min = 1, max = 255, message = "Provider id must be 1-255 characters"))]
    pub provider_id: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Preferred nickname; derived from the email when absent
    #[validate(length(max = 50, message = "Nickname must be at most 50 characters"))]
    pub nickname: Option<String>,

    #[validate(length(max = 500, message = "Profile image URL must be at most 500 characters"))]
    pub profile_image: Option<String>,
}

// ============================================================================
// Member Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 20, message = "Nickname must be 2-20 characters"))]
    pub nickname: Option<String>,

    /// Image URL; an empty string removes the current image
    #[validate(length(max = 500, message = "Profile image URL must be at most 500 characters"))]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub new_password: String,
}

/// Local accounts confirm with their password; social accounts send nothing
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct WithdrawRequest {
    pub password: Option<String>,
}

// ============================================================================
// Post Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    pub category: PostCategory,

    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePostRequest {
    pub category: Option<PostCategory>,

    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: Option<String>,
}

// ============================================================================
// Comment Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Content must be 1-1000 characters"))]
    pub content: String,

    /// Top-level comment being replied to
    pub parent_id: Option<Id>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Content must be 1-1000 characters"))]
    pub content: String,
}

// ============================================================================
// Chat Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 50, message = "Room name must be 1-50 characters"))]
    pub name: String,

    #[validate(range(min = 2, max = 100, message = "Room capacity must be 2-100"))]
    pub max_members: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 1000, message = "Message must be 1-1000 characters"))]
    pub content: String,
}

// ============================================================================
// Coupon Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RedeemCouponRequest {
    #[validate(length(min = 1, max = 32, message = "Coupon code must be 1-32 characters"))]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IssueCouponRequest {
    pub currency: Currency,

    #[validate(range(min = 1, max = 1_000_000, message = "Amount must be 1-1000000"))]
    pub amount: i64,

    pub expires_at: DateTime<Utc>,

    #[validate(range(min = 1, max = 1000, message = "Count must be 1-1000"))]
    pub count: u32,

    /// Assign every issued coupon to this member
    pub member_id: Option<Id>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignCouponRequest {
    pub member_id: Id,
}

// ============================================================================
// Wallet Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExchangeRequest {
    #[validate(range(min = 1, max = 1000, message = "Tickets must be 1-1000"))]
    pub tickets: i64,
}

/// Admin grant or deduction
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdjustBalanceRequest {
    pub member_id: Id,

    pub currency: Currency,

    #[validate(range(min = 1, max = 1_000_000, message = "Amount must be 1-1000000"))]
    pub amount: i64,

    /// Optional idempotency key
    #[validate(length(min = 1, max = 100, message = "Reference must be 1-100 characters"))]
    pub reference: Option<String>,
}

// ============================================================================
// Roadmap Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateRoadmapRequest {
    #[validate(length(min = 2, max = 100, message = "Topic must be 2-100 characters"))]
    pub topic: String,

    pub level: RoadmapLevel,

    #[validate(range(min = 1, max = 52, message = "Weeks must be 1-52"))]
    pub weeks: u32,
}

// ============================================================================
// Admin Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeStatusRequest {
    pub status: MemberStatus,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeRolesRequest {
    pub roles: Roles,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation() {
        let ok = SignupRequest {
            email: "a@b.com".into(),
            password: "Password1".into(),
            nickname: "ab".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = SignupRequest {
            email: "not-an-email".into(),
            nickname: "x".into(),
            ..ok
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("nickname"));
    }

    #[test]
    fn test_room_capacity_bounds() {
        let room = |max_members| CreateRoomRequest {
            name: "study".into(),
            max_members,
        };
        assert!(room(2).validate().is_ok());
        assert!(room(100).validate().is_ok());
        assert!(room(1).validate().is_err());
        assert!(room(101).validate().is_err());
    }

    #[test]
    fn test_roadmap_request_deserializes_enums() {
        let request: GenerateRoadmapRequest =
            serde_json::from_str(r#"{"topic":"Rust","level":"BEGINNER","weeks":4}"#).unwrap();
        assert_eq!(request.level, RoadmapLevel::Beginner);
        assert!(request.validate().is_ok());

        let request = GenerateRoadmapRequest { weeks: 53, ..request };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_ids_accept_strings() {
        let request: AssignCouponRequest =
            serde_json::from_str(r#"{"member_id":"7318129001234"}"#).unwrap();
        assert_eq!(request.member_id, Id::new(7_318_129_001_234));
    }

    #[test]
    fn test_optional_fields_validated_when_present() {
        let request = UpdateProfileRequest {
            nickname: Some("x".into()),
            profile_image: None,
        };
        assert!(request.validate().is_err());

        let request = UpdateProfileRequest {
            nickname: None,
            profile_image: None,
        };
        assert!(request.validate().is_ok());
    }
}
