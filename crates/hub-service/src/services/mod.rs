//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and orchestrates
//! repositories, ports and domain rules for one area of the product.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod comment;
pub mod context;
pub mod coupon;
pub mod error;
pub mod like;
pub mod member;
pub mod post;
pub mod roadmap;
pub mod wallet;

pub use admin::AdminService;
pub use auth::AuthService;
pub use chat::ChatService;
pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use coupon::CouponService;
pub use error::{ServiceError, ServiceResult};
pub use like::LikeService;
pub use member::MemberService;
pub use post::PostService;
pub use roadmap::RoadmapService;
pub use wallet::{DistributionReport, WalletService};
