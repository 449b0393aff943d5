//! # hub-service
//!
//! Application layer: business services, request/response DTOs and roadmap
//! generators. Infrastructure is reached only through the repository and port
//! traits of `hub-core`.

pub mod dto;
pub mod generators;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use generators::{LlmRoadmapGenerator, TemplateRoadmapGenerator};
pub use services::{
    AdminService, AuthService, ChatService, CommentService, CouponService, DistributionReport,
    LikeService, MemberService, PostService, RoadmapService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, WalletService,
};
