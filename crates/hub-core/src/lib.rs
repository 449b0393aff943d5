//! # hub-core
//!
//! Domain layer of the study hub: members, posts, chat, coupons, the
//! token/ticket ledger and roadmaps. No infrastructure dependencies live here.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

pub use entities::{
    generate_coupon_code, Account, ChatMessage, ChatRoom, ChatRoomMember, ChatRoomView, Comment,
    CommentView, Coupon, CouponState, Currency, LedgerEntry, LedgerReason, Member, MemberStatus,
    MessageKind, NewLedgerEntry, OAuthProvider, Post, PostCategory, PostLike, PostView, Roadmap,
    RoadmapLevel, RoadmapStep, RoomDeparture,
};
pub use error::DomainError;
pub use events::{DomainEvent, EventChannel};
pub use traits::{
    ChatRepository, CommentRepository, CouponRepository, EventPublisher, LedgerRepository,
    LikeRepository, MemberRepository, PostQuery, PostRepository, RefreshSession,
    RepoResult, RoadmapGenerator, RoadmapRepository, RoadmapSpec, SessionStore,
};
pub use value_objects::{Id, IdGenerator, IdParseError, Page, PageRequest, Roles};
