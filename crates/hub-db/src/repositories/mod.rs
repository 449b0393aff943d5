//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in hub-core.

mod chat;
mod comment;
mod coupon;
mod error;
mod ledger;
mod like;
mod member;
mod post;
mod roadmap;

pub use chat::PgChatRepository;
pub use comment::PgCommentRepository;
pub use coupon::PgCouponRepository;
pub use ledger::PgLedgerRepository;
pub use like::PgLikeRepository;
pub use member::PgMemberRepository;
pub use post::PgPostRepository;
pub use roadmap::PgRoadmapRepository;
