//! Database models - SQLx-compatible structs for PostgreSQL tables

mod chat;
mod comment;
mod coupon;
mod ledger;
mod member;
mod post;
mod roadmap;

pub use chat::{ChatMessageModel, ChatRoomModel, ChatRoomViewModel};
pub use comment::{CommentModel, CommentViewModel};
pub use coupon::CouponModel;
pub use ledger::{AccountModel, LedgerEntryModel};
pub use member::MemberModel;
pub use post::{PostModel, PostViewModel};
pub use roadmap::RoadmapModel;
