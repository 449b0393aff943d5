//! Domain errors - every business rule violation with a stable error code

use thiserror::Error;

use crate::entities::Currency;
use crate::value_objects::Id;

#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Member not found: {0}")]
    MemberNotFound(Id),

    #[error("Post not found: {0}")]
    PostNotFound(Id),

    #[error("Comment not found: {0}")]
    CommentNotFound(Id),

    #[error("Like not found")]
    LikeNotFound,

    #[error("Chat room not found: {0}")]
    ChatRoomNotFound(Id),

    #[error("Coupon not found")]
    CouponNotFound,

    #[error("Roadmap not found: {0}")]
    RoadmapNotFound(Id),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid nickname: {0}")]
    InvalidNickname(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Amount must be non-zero")]
    InvalidAmount,

    #[error("Replies must target a top-level comment of the same post")]
    InvalidParentComment,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Account is suspended")]
    AccountSuspended,

    #[error("Account has been withdrawn")]
    AccountWithdrawn,

    #[error("Admin role required")]
    AdminRequired,

    #[error("Not the author of this post")]
    NotPostAuthor,

    #[error("Not the author of this comment")]
    NotCommentAuthor,

    #[error("Not the owner of this roadmap")]
    NotRoadmapOwner,

    #[error("Not a member of this chat room")]
    NotRoomMember,

    #[error("Coupon belongs to another member")]
    CouponNotOwned,

    #[error("Admins cannot change their own account")]
    CannotModifySelf,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Nickname already in use")]
    NicknameAlreadyExists,

    #[error("Post already liked")]
    AlreadyLiked,

    #[error("Already joined this chat room")]
    AlreadyJoined,

    #[error("Coupon already assigned")]
    CouponAlreadyAssigned,

    #[error("Coupon already used")]
    CouponAlreadyUsed,

    #[error("Coupon code already exists")]
    CouponCodeExists,

    #[error("Ledger entry already recorded: {0}")]
    DuplicateTransaction(String),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Coupon has expired")]
    CouponExpired,

    #[error("Insufficient {currency:?} balance: have {balance}, need {required}")]
    InsufficientBalance {
        currency: Currency,
        balance: i64,
        required: i64,
    },

    #[error("Chat room is full")]
    ChatRoomFull,

    #[error("Withdrawn members cannot be modified")]
    MemberWithdrawn,

    #[error("Account has no local password")]
    PasswordNotSet,

    // =========================================================================
    // Upstream Errors
    // =========================================================================
    #[error("Roadmap generation failed: {0}")]
    RoadmapGenerationFailed(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            Self::PostNotFound(_) => "POST_NOT_FOUND",
            Self::CommentNotFound(_) => "COMMENT_NOT_FOUND",
            Self::LikeNotFound => "LIKE_NOT_FOUND",
            Self::ChatRoomNotFound(_) => "CHAT_ROOM_NOT_FOUND",
            Self::CouponNotFound => "COUPON_NOT_FOUND",
            Self::RoadmapNotFound(_) => "ROADMAP_NOT_FOUND",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidNickname(_) => "INVALID_NICKNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidParentComment => "INVALID_PARENT_COMMENT",

            // Authorization
            Self::AccountSuspended => "ACCOUNT_SUSPENDED",
            Self::AccountWithdrawn => "ACCOUNT_WITHDRAWN",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::NotPostAuthor => "NOT_POST_AUTHOR",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::NotRoadmapOwner => "NOT_ROADMAP_OWNER",
            Self::NotRoomMember => "NOT_ROOM_MEMBER",
            Self::CouponNotOwned => "COUPON_NOT_OWNED",
            Self::CannotModifySelf => "CANNOT_MODIFY_SELF",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::NicknameAlreadyExists => "NICKNAME_ALREADY_EXISTS",
            Self::AlreadyLiked => "ALREADY_LIKED",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::CouponAlreadyAssigned => "COUPON_ALREADY_ASSIGNED",
            Self::CouponAlreadyUsed => "COUPON_ALREADY_USED",
            Self::CouponCodeExists => "COUPON_CODE_EXISTS",
            Self::DuplicateTransaction(_) => "DUPLICATE_TRANSACTION",

            // Business Rules
            Self::CouponExpired => "COUPON_EXPIRED",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::ChatRoomFull => "CHAT_ROOM_FULL",
            Self::MemberWithdrawn => "MEMBER_WITHDRAWN",
            Self::PasswordNotSet => "PASSWORD_NOT_SET",

            // Upstream
            Self::RoadmapGenerationFailed(_) => "ROADMAP_GENERATION_FAILED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MemberNotFound(_)
                | Self::PostNotFound(_)
                | Self::CommentNotFound(_)
                | Self::LikeNotFound
                | Self::ChatRoomNotFound(_)
                | Self::CouponNotFound
                | Self::RoadmapNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidNickname(_)
                | Self::WeakPassword(_)
                | Self::ContentTooLong { .. }
                | Self::InvalidAmount
                | Self::InvalidParentComment
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::AccountSuspended
                | Self::AccountWithdrawn
                | Self::AdminRequired
                | Self::NotPostAuthor
                | Self::NotCommentAuthor
                | Self::NotRoadmapOwner
                | Self::NotRoomMember
                | Self::CouponNotOwned
                | Self::CannotModifySelf
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists
                | Self::NicknameAlreadyExists
                | Self::AlreadyLiked
                | Self::AlreadyJoined
                | Self::CouponAlreadyAssigned
                | Self::CouponAlreadyUsed
                | Self::CouponCodeExists
                | Self::DuplicateTransaction(_)
        )
    }

    /// Rules of the domain that reject an otherwise well-formed request
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::CouponExpired
                | Self::InsufficientBalance { .. }
                | Self::ChatRoomFull
                | Self::MemberWithdrawn
                | Self::PasswordNotSet
        )
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::RoadmapGenerationFailed(_))
    }

    /// HTTP status code this error renders as
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_validation() || self.is_business_rule() {
            400
        } else if self.is_authorization() {
            403
        } else if self.is_conflict() {
            409
        } else if self.is_upstream() {
            502
        } else {
            500
        }
    }
}
