//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AdjustBalanceRequest, AssignCouponRequest, ChangePasswordRequest, ChangeRolesRequest,
    ChangeStatusRequest, CreateCommentRequest, CreatePostRequest, CreateRoomRequest,
    ExchangeRequest, GenerateRoadmapRequest, IssueCouponRequest, LoginRequest, LogoutRequest,
    OAuthLoginRequest, RedeemCouponRequest, RefreshTokenRequest, SendMessageRequest,
    SignupRequest, UpdateCommentRequest, UpdatePostRequest, UpdateProfileRequest,
    WithdrawRequest,
};

pub use responses::{
    AuthResponse, BalanceResponse, ChatMessageResponse, ChatRoomResponse, CommentResponse,
    CouponResponse, ExchangeResponse, HealthChecks, HealthResponse, LedgerEntryResponse,
    LikeResponse, MemberResponse, MyCommentResponse, MyPageResponse, NicknameCheckResponse,
    PostResponse, PublicMemberResponse, ReadinessResponse, RedeemCouponResponse,
    RoadmapResponse,
};

pub use mappers::build_comment_thread;
