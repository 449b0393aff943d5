//! Domain entities - core business objects

mod chat;
mod comment;
mod coupon;
mod member;
mod post;
mod roadmap;
mod wallet;

pub use chat::{
    ChatMessage, ChatRoom, ChatRoomMember, ChatRoomView, MessageKind, RoomDeparture,
};
pub use comment::{Comment, CommentView};
pub use coupon::{generate_coupon_code, Coupon, CouponState};
pub use member::{Member, MemberStatus, OAuthProvider};
pub use post::{Post, PostCategory, PostLike, PostView};
pub use roadmap::{Roadmap, RoadmapLevel, RoadmapStep};
pub use wallet::{Account, Currency, LedgerEntry, LedgerReason, NewLedgerEntry};
