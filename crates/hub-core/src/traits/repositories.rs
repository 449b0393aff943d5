//! Repository traits (ports) - the data access the domain needs
//!
//! The domain layer states what it needs; `hub-db` provides the PostgreSQL
//! implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Account, ChatMessage, ChatRoom, ChatRoomMember, ChatRoomView, Comment, CommentView, Coupon,
    Currency, LedgerEntry, Member, MemberStatus, NewLedgerEntry, OAuthProvider, Post, PostCategory,
    PostLike, PostView, Roadmap, RoomDeparture,
};
use crate::error::DomainError;
use crate::value_objects::{Id, Page, PageRequest};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member by ID, whatever the status
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Member>>;

    /// Find the member holding `email`, preferring a live account over
    /// withdrawn ones
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>>;

    /// Find a member linked to a social provider account
    async fn find_by_provider(
        &self,
        provider: OAuthProvider,
        provider_id: &str,
    ) -> RepoResult<Option<Member>>;

    /// Email held by a non-withdrawn member
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Nickname held by a non-withdrawn member
    async fn nickname_exists(&self, nickname: &str) -> RepoResult<bool>;

    /// Insert the member and open its TOKEN and TICKET accounts atomically
    async fn create(&self, member: &Member, password_hash: Option<&str>) -> RepoResult<()>;

    /// Persist nickname, profile image, status and roles
    async fn update(&self, member: &Member) -> RepoResult<()>;

    async fn get_password_hash(&self, id: Id) -> RepoResult<Option<String>>;

    async fn update_password(&self, id: Id, password_hash: &str) -> RepoResult<()>;

    /// Page through members, newest first
    async fn list(
        &self,
        status: Option<MemberStatus>,
        page: PageRequest,
    ) -> RepoResult<Page<Member>>;

    /// Active member ids greater than `after`, ascending (batch cursor)
    async fn active_ids_after(&self, after: Option<Id>, limit: i64) -> RepoResult<Vec<Id>>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Filters for listing posts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub category: Option<PostCategory>,
    /// Case-insensitive match against title or content
    pub keyword: Option<String>,
    pub author_id: Option<Id>,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a live (not deleted) post
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Post>>;

    /// Live post with author nickname and counts
    async fn find_view(&self, id: Id) -> RepoResult<Option<PostView>>;

    async fn create(&self, post: &Post) -> RepoResult<()>;

    async fn update(&self, post: &Post) -> RepoResult<()>;

    async fn soft_delete(&self, id: Id) -> RepoResult<()>;

    async fn increment_view_count(&self, id: Id) -> RepoResult<()>;

    /// Newest first
    async fn list(&self, query: &PostQuery, page: PageRequest) -> RepoResult<Page<PostView>>;

    /// Live posts liked by `member_id`, most recently liked first
    async fn list_liked_by(&self, member_id: Id, page: PageRequest) -> RepoResult<Page<PostView>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find a comment, deleted ones included
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Comment>>;

    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    async fn update(&self, comment: &Comment) -> RepoResult<()>;

    async fn soft_delete(&self, id: Id) -> RepoResult<()>;

    /// Every comment on the post, deleted included, oldest first
    async fn list_by_post(&self, post_id: Id) -> RepoResult<Vec<CommentView>>;

    /// Live comments written by `author_id`, newest first
    async fn list_by_author(&self, author_id: Id, page: PageRequest) -> RepoResult<Page<Comment>>;
}

// ============================================================================
// Like Repository
// ============================================================================

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Fails with `AlreadyLiked` on a duplicate
    async fn create(&self, like: &PostLike) -> RepoResult<()>;

    /// Returns whether a like was removed
    async fn delete(&self, post_id: Id, member_id: Id) -> RepoResult<bool>;

    async fn exists(&self, post_id: Id, member_id: Id) -> RepoResult<bool>;
}

// ============================================================================
// Chat Repository
// ============================================================================

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Insert the room and its owner's membership atomically
    async fn create_room(&self, room: &ChatRoom) -> RepoResult<()>;

    /// Find an open room
    async fn find_room(&self, id: Id) -> RepoResult<Option<ChatRoom>>;

    /// Open rooms, newest first
    async fn list_rooms(&self, page: PageRequest) -> RepoResult<Page<ChatRoomView>>;

    /// Open rooms `member_id` belongs to
    async fn list_rooms_of(&self, member_id: Id) -> RepoResult<Vec<ChatRoomView>>;

    /// Add a member while holding the room lock.
    ///
    /// Fails with `ChatRoomFull` or `AlreadyJoined`.
    async fn join(&self, membership: &ChatRoomMember) -> RepoResult<()>;

    /// Remove a member while holding the room lock, then close the room
    /// or hand it to the longest-standing member in the same transaction.
    ///
    /// Fails with `ChatRoomNotFound` or `NotRoomMember`.
    async fn leave(&self, room_id: Id, member_id: Id) -> RepoResult<RoomDeparture>;

    async fn is_member(&self, room_id: Id, member_id: Id) -> RepoResult<bool>;

    async fn save_message(&self, message: &ChatMessage) -> RepoResult<()>;

    /// Messages older than `before` (or the newest), newest first
    async fn messages(
        &self,
        room_id: Id,
        before: Option<Id>,
        limit: i64,
    ) -> RepoResult<Vec<ChatMessage>>;
}

// ============================================================================
// Coupon Repository
// ============================================================================

#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Insert a batch; fails with `CouponCodeExists` on a code collision
    async fn create_many(&self, coupons: &[Coupon]) -> RepoResult<()>;

    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Coupon>>;

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<Coupon>>;

    /// Assign under a row lock on the coupon
    async fn assign(&self, coupon_id: Id, member_id: Id, now: DateTime<Utc>) -> RepoResult<Coupon>;

    /// Lock the coupon, mark it used by `member_id` and credit its value
    /// through `entry_id` in one transaction.
    async fn redeem(
        &self,
        code: &str,
        member_id: Id,
        entry_id: Id,
        now: DateTime<Utc>,
    ) -> RepoResult<(Coupon, LedgerEntry)>;

    /// Newest first
    async fn list(&self, page: PageRequest) -> RepoResult<Page<Coupon>>;

    async fn list_by_member(&self, member_id: Id) -> RepoResult<Vec<Coupon>>;
}

// ============================================================================
// Ledger Repository
// ============================================================================

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Both accounts of the member; a missing account reads as zero
    async fn balances(&self, member_id: Id) -> RepoResult<Vec<Account>>;

    /// Apply every entry or none.
    ///
    /// Accounts are locked in (member, currency) order. Fails with
    /// `InsufficientBalance` or `DuplicateTransaction`.
    async fn apply(&self, entries: &[NewLedgerEntry]) -> RepoResult<Vec<LedgerEntry>>;

    /// Newest first
    async fn history(
        &self,
        member_id: Id,
        currency: Option<Currency>,
        page: PageRequest,
    ) -> RepoResult<Page<LedgerEntry>>;
}

// ============================================================================
// Roadmap Repository
// ============================================================================

#[async_trait]
pub trait RoadmapRepository: Send + Sync {
    async fn create(&self, roadmap: &Roadmap) -> RepoResult<()>;

    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Roadmap>>;

    /// Newest first
    async fn list_by_member(&self, member_id: Id, page: PageRequest) -> RepoResult<Page<Roadmap>>;

    async fn delete(&self, id: Id) -> RepoResult<()>;
}
