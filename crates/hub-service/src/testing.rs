//! In-memory implementations of every repository and port, for service tests.
//!
//! One [`InMemoryStore`] backs all traits so cross-table behaviour (accounts
//! opened with a member, coupon redemption writing the ledger, post counts)
//! matches the Postgres repositories.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hub_common::auth::JwtService;
use hub_common::config::WalletConfig;
use hub_core::{
    Account, ChatMessage, ChatRepository, ChatRoom, ChatRoomMember, ChatRoomView, Comment,
    CommentRepository, CommentView, Coupon, CouponRepository, Currency, DomainError, DomainEvent,
    EventChannel, EventPublisher, Id, IdGenerator, LedgerEntry, LedgerReason, LedgerRepository,
    LikeRepository, Member, MemberRepository, MemberStatus, NewLedgerEntry, OAuthProvider, Page,
    PageRequest, Post, PostLike, PostQuery, PostRepository, PostView, RefreshSession, RepoResult,
    Roadmap, RoadmapGenerator, RoadmapRepository, RoadmapSpec, RoadmapStep, Roles, RoomDeparture,
    SessionStore,
};
use parking_lot::Mutex;

use crate::services::{ServiceContext, ServiceContextBuilder};

pub(crate) const TEST_PASSWORD: &str = "Password123";

fn page_of<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let content = items
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.limit() as usize)
        .collect();
    Page::new(content, request, total)
}

#[derive(Default)]
struct State {
    members: BTreeMap<Id, (Member, Option<String>)>,
    posts: BTreeMap<Id, Post>,
    comments: BTreeMap<Id, Comment>,
    likes: Vec<PostLike>,
    rooms: BTreeMap<Id, ChatRoom>,
    room_members: Vec<ChatRoomMember>,
    messages: Vec<ChatMessage>,
    coupons: BTreeMap<Id, Coupon>,
    accounts: BTreeMap<(Id, Currency), Account>,
    ledger: Vec<LedgerEntry>,
    roadmaps: BTreeMap<Id, Roadmap>,
    sessions: HashMap<String, RefreshSession>,
    events: Vec<(EventChannel, DomainEvent)>,
}

impl State {
    fn nickname_of(&self, id: Id) -> String {
        self.members
            .get(&id)
            .map(|(m, _)| m.nickname.clone())
            .unwrap_or_default()
    }

    fn post_view(&self, post: &Post) -> PostView {
        PostView {
            post: post.clone(),
            author_nickname: self.nickname_of(post.author_id),
            like_count: self.likes.iter().filter(|l| l.post_id == post.id).count() as i64,
            comment_count: self
                .comments
                .values()
                .filter(|c| c.post_id == post.id && !c.is_deleted())
                .count() as i64,
        }
    }

    fn room_view(&self, room: &ChatRoom) -> ChatRoomView {
        ChatRoomView {
            room: room.clone(),
            member_count: self
                .room_members
                .iter()
                .filter(|m| m.room_id == room.id)
                .count() as i64,
        }
    }

    fn live_room(&self, id: Id) -> Option<&ChatRoom> {
        self.rooms.get(&id).filter(|r| !r.is_closed())
    }

    fn apply(&mut self, entries: &[NewLedgerEntry]) -> RepoResult<Vec<LedgerEntry>> {
        for entry in entries {
            entry.validate()?;
        }

        let mut accounts = self.accounts.clone();
        let mut applied: Vec<LedgerEntry> = Vec::with_capacity(entries.len());

        for entry in entries {
            if !self.members.contains_key(&entry.member_id) {
                return Err(DomainError::MemberNotFound(entry.member_id));
            }
            if let Some(reference) = &entry.reference {
                let duplicate = self.ledger.iter().chain(applied.iter()).any(|l| {
                    l.member_id == entry.member_id
                        && l.currency == entry.currency
                        && l.reason == entry.reason
                        && l.reference.as_deref() == Some(reference.as_str())
                });
                if duplicate {
                    return Err(DomainError::DuplicateTransaction(reference.clone()));
                }
            }
            let account = accounts
                .entry(entry.account_key())
                .or_insert_with(|| Account::open(entry.member_id, entry.currency));
            let next = account.balance_after(entry.amount)?;
            account.balance = next;
            applied.push(entry.clone().applied(next));
        }

        self.accounts = accounts;
        self.ledger.extend(applied.iter().cloned());
        Ok(applied)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn balance(&self, member_id: Id, currency: Currency) -> i64 {
        self.state
            .lock()
            .accounts
            .get(&(member_id, currency))
            .map_or(0, |a| a.balance)
    }

    pub fn ledger_entries(&self, member_id: Id) -> Vec<LedgerEntry> {
        self.state
            .lock()
            .ledger
            .iter()
            .filter(|e| e.member_id == member_id)
            .cloned()
            .collect()
    }

    pub fn events(&self) -> Vec<(EventChannel, DomainEvent)> {
        self.state.lock().events.clone()
    }

    pub fn session_count(&self, member_id: Id) -> usize {
        self.state
            .lock()
            .sessions
            .values()
            .filter(|s| s.member_id == member_id)
            .count()
    }

    pub fn member(&self, id: Id) -> Option<Member> {
        self.state.lock().members.get(&id).map(|(m, _)| m.clone())
    }

    pub fn coupon(&self, id: Id) -> Option<Coupon> {
        self.state.lock().coupons.get(&id).cloned()
    }

    pub fn room(&self, id: Id) -> Option<ChatRoom> {
        self.state.lock().rooms.get(&id).cloned()
    }

    pub fn insert_coupon(&self, coupon: Coupon) {
        self.state.lock().coupons.insert(coupon.id, coupon);
    }
}

// ============================================================================
// Members
// ============================================================================

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Member>> {
        Ok(self.member(id))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>> {
        let state = self.state.lock();
        let mut matches: Vec<&Member> = state
            .members
            .values()
            .map(|(m, _)| m)
            .filter(|m| m.email == email)
            .collect();
        matches.sort_by_key(|m| (m.status == MemberStatus::Withdrawn, std::cmp::Reverse(m.id)));
        Ok(matches.first().map(|m| (*m).clone()))
    }

    async fn find_by_provider(
        &self,
        provider: OAuthProvider,
        provider_id: &str,
    ) -> RepoResult<Option<Member>> {
        Ok(self
            .state
            .lock()
            .members
            .values()
            .map(|(m, _)| m)
            .find(|m| m.provider == provider && m.provider_id.as_deref() == Some(provider_id))
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .members
            .values()
            .any(|(m, _)| m.email == email && m.status != MemberStatus::Withdrawn))
    }

    async fn nickname_exists(&self, nickname: &str) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .members
            .values()
            .any(|(m, _)| m.nickname == nickname && m.status != MemberStatus::Withdrawn))
    }

    async fn create(&self, member: &Member, password_hash: Option<&str>) -> RepoResult<()> {
        let mut state = self.state.lock();
        for (existing, _) in state.members.values() {
            if existing.status == MemberStatus::Withdrawn {
                continue;
            }
            if existing.email == member.email {
                return Err(DomainError::EmailAlreadyExists);
            }
            if existing.nickname == member.nickname {
                return Err(DomainError::NicknameAlreadyExists);
            }
        }
        state
            .members
            .insert(member.id, (member.clone(), password_hash.map(String::from)));
        for currency in Currency::ALL {
            state
                .accounts
                .insert((member.id, currency), Account::open(member.id, currency));
        }
        Ok(())
    }

    async fn update(&self, member: &Member) -> RepoResult<()> {
        let mut state = self.state.lock();
        let clash = state.members.values().any(|(m, _)| {
            m.id != member.id
                && m.status != MemberStatus::Withdrawn
                && m.nickname == member.nickname
        });
        if clash && member.status != MemberStatus::Withdrawn {
            return Err(DomainError::NicknameAlreadyExists);
        }
        let entry = state
            .members
            .get_mut(&member.id)
            .ok_or(DomainError::MemberNotFound(member.id))?;
        entry.0 = member.clone();
        Ok(())
    }

    async fn get_password_hash(&self, id: Id) -> RepoResult<Option<String>> {
        Ok(self
            .state
            .lock()
            .members
            .get(&id)
            .and_then(|(_, hash)| hash.clone()))
    }

    async fn update_password(&self, id: Id, password_hash: &str) -> RepoResult<()> {
        let mut state = self.state.lock();
        let entry = state
            .members
            .get_mut(&id)
            .ok_or(DomainError::MemberNotFound(id))?;
        entry.1 = Some(password_hash.to_string());
        Ok(())
    }

    async fn list(&self, status: Option<MemberStatus>, page: PageRequest) -> RepoResult<Page<Member>> {
        let members: Vec<Member> = self
            .state
            .lock()
            .members
            .values()
            .rev()
            .map(|(m, _)| m)
            .filter(|m| status.map_or(true, |s| m.status == s))
            .cloned()
            .collect();
        Ok(page_of(members, page))
    }

    async fn active_ids_after(&self, after: Option<Id>, limit: i64) -> RepoResult<Vec<Id>> {
        Ok(self
            .state
            .lock()
            .members
            .values()
            .map(|(m, _)| m)
            .filter(|m| m.is_active() && after.map_or(true, |a| m.id > a))
            .take(limit as usize)
            .map(|m| m.id)
            .collect())
    }
}

// ============================================================================
// Posts, comments, likes
// ============================================================================

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Post>> {
        Ok(self
            .state
            .lock()
            .posts
            .get(&id)
            .filter(|p| !p.is_deleted())
            .cloned())
    }

    async fn find_view(&self, id: Id) -> RepoResult<Option<PostView>> {
        let state = self.state.lock();
        Ok(state
            .posts
            .get(&id)
            .filter(|p| !p.is_deleted())
            .map(|p| state.post_view(p)))
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.state.lock().posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> RepoResult<()> {
        let mut state = self.state.lock();
        match state.posts.get_mut(&post.id).filter(|p| !p.is_deleted()) {
            Some(stored) => {
                *stored = post.clone();
                Ok(())
            }
            None => Err(DomainError::PostNotFound(post.id)),
        }
    }

    async fn soft_delete(&self, id: Id) -> RepoResult<()> {
        let mut state = self.state.lock();
        match state.posts.get_mut(&id).filter(|p| !p.is_deleted()) {
            Some(stored) => {
                stored.deleted_at = Some(Utc::now());
                Ok(())
            }
            None => Err(DomainError::PostNotFound(id)),
        }
    }

    async fn increment_view_count(&self, id: Id) -> RepoResult<()> {
        if let Some(post) = self.state.lock().posts.get_mut(&id) {
            post.view_count += 1;
        }
        Ok(())
    }

    async fn list(&self, query: &PostQuery, page: PageRequest) -> RepoResult<Page<PostView>> {
        let state = self.state.lock();
        let keyword = query.keyword.as_ref().map(|k| k.to_lowercase());
        let views: Vec<PostView> = state
            .posts
            .values()
            .rev()
            .filter(|p| !p.is_deleted())
            .filter(|p| query.category.map_or(true, |c| p.category == c))
            .filter(|p| query.author_id.map_or(true, |a| p.author_id == a))
            .filter(|p| {
                keyword.as_ref().map_or(true, |k| {
                    p.title.to_lowercase().contains(k) || p.content.to_lowercase().contains(k)
                })
            })
            .map(|p| state.post_view(p))
            .collect();
        Ok(page_of(views, page))
    }

    async fn list_liked_by(&self, member_id: Id, page: PageRequest) -> RepoResult<Page<PostView>> {
        let state = self.state.lock();
        let views: Vec<PostView> = state
            .likes
            .iter()
            .rev()
            .filter(|l| l.member_id == member_id)
            .filter_map(|l| state.posts.get(&l.post_id))
            .filter(|p| !p.is_deleted())
            .map(|p| state.post_view(p))
            .collect();
        Ok(page_of(views, page))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Comment>> {
        Ok(self.state.lock().comments.get(&id).cloned())
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let mut state = self.state.lock();
        if !state.posts.contains_key(&comment.post_id) {
            return Err(DomainError::PostNotFound(comment.post_id));
        }
        state.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        let mut state = self.state.lock();
        match state.comments.get_mut(&comment.id).filter(|c| !c.is_deleted()) {
            Some(stored) => {
                *stored = comment.clone();
                Ok(())
            }
            None => Err(DomainError::CommentNotFound(comment.id)),
        }
    }

    async fn soft_delete(&self, id: Id) -> RepoResult<()> {
        let mut state = self.state.lock();
        match state.comments.get_mut(&id).filter(|c| !c.is_deleted()) {
            Some(stored) => {
                stored.deleted_at = Some(Utc::now());
                Ok(())
            }
            None => Err(DomainError::CommentNotFound(id)),
        }
    }

    async fn list_by_post(&self, post_id: Id) -> RepoResult<Vec<CommentView>> {
        let state = self.state.lock();
        Ok(state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .map(|c| CommentView {
                comment: c.clone(),
                author_nickname: state.nickname_of(c.author_id),
            })
            .collect())
    }

    async fn list_by_author(&self, author_id: Id, page: PageRequest) -> RepoResult<Page<Comment>> {
        let comments: Vec<Comment> = self
            .state
            .lock()
            .comments
            .values()
            .rev()
            .filter(|c| c.author_id == author_id && !c.is_deleted())
            .cloned()
            .collect();
        Ok(page_of(comments, page))
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn create(&self, like: &PostLike) -> RepoResult<()> {
        let mut state = self.state.lock();
        if !state.posts.contains_key(&like.post_id) {
            return Err(DomainError::PostNotFound(like.post_id));
        }
        if state
            .likes
            .iter()
            .any(|l| l.post_id == like.post_id && l.member_id == like.member_id)
        {
            return Err(DomainError::AlreadyLiked);
        }
        state.likes.push(*like);
        Ok(())
    }

    async fn delete(&self, post_id: Id, member_id: Id) -> RepoResult<bool> {
        let mut state = self.state.lock();
        let before = state.likes.len();
        state
            .likes
            .retain(|l| !(l.post_id == post_id && l.member_id == member_id));
        Ok(state.likes.len() != before)
    }

    async fn exists(&self, post_id: Id, member_id: Id) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .likes
            .iter()
            .any(|l| l.post_id == post_id && l.member_id == member_id))
    }
}

// ============================================================================
// Chat
// ============================================================================

#[async_trait]
impl ChatRepository for InMemoryStore {
    async fn create_room(&self, room: &ChatRoom) -> RepoResult<()> {
        let mut state = self.state.lock();
        state.rooms.insert(room.id, room.clone());
        state
            .room_members
            .push(ChatRoomMember::new(room.id, room.owner_id));
        Ok(())
    }

    async fn find_room(&self, id: Id) -> RepoResult<Option<ChatRoom>> {
        Ok(self.state.lock().live_room(id).cloned())
    }

    async fn list_rooms(&self, page: PageRequest) -> RepoResult<Page<ChatRoomView>> {
        let state = self.state.lock();
        let rooms: Vec<ChatRoomView> = state
            .rooms
            .values()
            .rev()
            .filter(|r| !r.is_closed())
            .map(|r| state.room_view(r))
            .collect();
        Ok(page_of(rooms, page))
    }

    async fn list_rooms_of(&self, member_id: Id) -> RepoResult<Vec<ChatRoomView>> {
        let state = self.state.lock();
        Ok(state
            .room_members
            .iter()
            .rev()
            .filter(|m| m.member_id == member_id)
            .filter_map(|m| state.live_room(m.room_id))
            .map(|r| state.room_view(r))
            .collect())
    }

    async fn join(&self, membership: &ChatRoomMember) -> RepoResult<()> {
        let mut state = self.state.lock();
        let room = state
            .live_room(membership.room_id)
            .cloned()
            .ok_or(DomainError::ChatRoomNotFound(membership.room_id))?;
        let members: Vec<&ChatRoomMember> = state
            .room_members
            .iter()
            .filter(|m| m.room_id == membership.room_id)
            .collect();
        if members.iter().any(|m| m.member_id == membership.member_id) {
            return Err(DomainError::AlreadyJoined);
        }
        room.ensure_capacity(members.len() as i64)?;
        state.room_members.push(*membership);
        Ok(())
    }

    async fn leave(&self, room_id: Id, member_id: Id) -> RepoResult<RoomDeparture> {
        let mut state = self.state.lock();
        let room = state
            .live_room(room_id)
            .cloned()
            .ok_or(DomainError::ChatRoomNotFound(room_id))?;

        let before = state.room_members.len();
        state
            .room_members
            .retain(|m| !(m.room_id == room_id && m.member_id == member_id));
        if state.room_members.len() == before {
            return Err(DomainError::NotRoomMember);
        }

        let next = state
            .room_members
            .iter()
            .filter(|m| m.room_id == room_id)
            .min_by_key(|m| (m.joined_at, m.member_id))
            .map(|m| m.member_id);

        let departure = room.departure(member_id, next);
        if let Some(room) = state.rooms.get_mut(&room_id) {
            match departure {
                RoomDeparture::Closed => room.deleted_at = Some(Utc::now()),
                RoomDeparture::OwnerTransferred(owner_id) => room.owner_id = owner_id,
                RoomDeparture::Left => {}
            }
        }
        Ok(departure)
    }

    async fn is_member(&self, room_id: Id, member_id: Id) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .room_members
            .iter()
            .any(|m| m.room_id == room_id && m.member_id == member_id))
    }

    async fn save_message(&self, message: &ChatMessage) -> RepoResult<()> {
        self.state.lock().messages.push(message.clone());
        Ok(())
    }

    async fn messages(
        &self,
        room_id: Id,
        before: Option<Id>,
        limit: i64,
    ) -> RepoResult<Vec<ChatMessage>> {
        Ok(self
            .state
            .lock()
            .messages
            .iter()
            .rev()
            .filter(|m| m.room_id == room_id && before.map_or(true, |b| m.id < b))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Coupons and ledger
// ============================================================================

#[async_trait]
impl CouponRepository for InMemoryStore {
    async fn create_many(&self, coupons: &[Coupon]) -> RepoResult<()> {
        let mut state = self.state.lock();
        for coupon in coupons {
            if state.coupons.values().any(|c| c.code == coupon.code) {
                return Err(DomainError::CouponCodeExists);
            }
        }
        for coupon in coupons {
            state.coupons.insert(coupon.id, coupon.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Coupon>> {
        Ok(self.coupon(id))
    }

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<Coupon>> {
        Ok(self
            .state
            .lock()
            .coupons
            .values()
            .find(|c| c.code == code)
            .cloned())
    }

    async fn assign(&self, coupon_id: Id, member_id: Id, now: DateTime<Utc>) -> RepoResult<Coupon> {
        let mut state = self.state.lock();
        let stored = state
            .coupons
            .get_mut(&coupon_id)
            .ok_or(DomainError::CouponNotFound)?;
        let mut coupon = stored.clone();
        coupon.assign(member_id, now)?;
        *stored = coupon.clone();
        Ok(coupon)
    }

    async fn redeem(
        &self,
        code: &str,
        member_id: Id,
        entry_id: Id,
        now: DateTime<Utc>,
    ) -> RepoResult<(Coupon, LedgerEntry)> {
        let mut state = self.state.lock();
        let mut coupon = state
            .coupons
            .values()
            .find(|c| c.code == code)
            .cloned()
            .ok_or(DomainError::CouponNotFound)?;
        coupon.redeem(member_id, now)?;

        let entry = NewLedgerEntry::credit(
            entry_id,
            member_id,
            coupon.currency,
            coupon.amount,
            LedgerReason::CouponRedeem,
        )
        .with_reference(coupon.id.to_string());
        let mut applied = state.apply(&[entry])?;

        state.coupons.insert(coupon.id, coupon.clone());
        let entry = applied.remove(0);
        Ok((coupon, entry))
    }

    async fn list(&self, page: PageRequest) -> RepoResult<Page<Coupon>> {
        let coupons: Vec<Coupon> = self.state.lock().coupons.values().rev().cloned().collect();
        Ok(page_of(coupons, page))
    }

    async fn list_by_member(&self, member_id: Id) -> RepoResult<Vec<Coupon>> {
        Ok(self
            .state
            .lock()
            .coupons
            .values()
            .rev()
            .filter(|c| c.member_id == Some(member_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LedgerRepository for InMemoryStore {
    async fn balances(&self, member_id: Id) -> RepoResult<Vec<Account>> {
        let state = self.state.lock();
        Ok(Currency::ALL
            .iter()
            .map(|&currency| {
                state
                    .accounts
                    .get(&(member_id, currency))
                    .copied()
                    .unwrap_or_else(|| Account::open(member_id, currency))
            })
            .collect())
    }

    async fn apply(&self, entries: &[NewLedgerEntry]) -> RepoResult<Vec<LedgerEntry>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        self.state.lock().apply(entries)
    }

    async fn history(
        &self,
        member_id: Id,
        currency: Option<Currency>,
        page: PageRequest,
    ) -> RepoResult<Page<LedgerEntry>> {
        let entries: Vec<LedgerEntry> = self
            .state
            .lock()
            .ledger
            .iter()
            .rev()
            .filter(|e| e.member_id == member_id && currency.map_or(true, |c| e.currency == c))
            .cloned()
            .collect();
        Ok(page_of(entries, page))
    }
}

// ============================================================================
// Roadmaps
// ============================================================================

#[async_trait]
impl RoadmapRepository for InMemoryStore {
    async fn create(&self, roadmap: &Roadmap) -> RepoResult<()> {
        self.state.lock().roadmaps.insert(roadmap.id, roadmap.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Roadmap>> {
        Ok(self.state.lock().roadmaps.get(&id).cloned())
    }

    async fn list_by_member(&self, member_id: Id, page: PageRequest) -> RepoResult<Page<Roadmap>> {
        let roadmaps: Vec<Roadmap> = self
            .state
            .lock()
            .roadmaps
            .values()
            .rev()
            .filter(|r| r.member_id == member_id)
            .cloned()
            .collect();
        Ok(page_of(roadmaps, page))
    }

    async fn delete(&self, id: Id) -> RepoResult<()> {
        self.state
            .lock()
            .roadmaps
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::RoadmapNotFound(id))
    }
}

// ============================================================================
// Ports
// ============================================================================

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn store(&self, token: &str, session: &RefreshSession) -> RepoResult<()> {
        self.state
            .lock()
            .sessions
            .insert(token.to_string(), session.clone());
        Ok(())
    }

    async fn validate(&self, token: &str) -> RepoResult<Option<RefreshSession>> {
        Ok(self.state.lock().sessions.get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> RepoResult<()> {
        self.state.lock().sessions.remove(token);
        Ok(())
    }

    async fn revoke_all(&self, member_id: Id) -> RepoResult<()> {
        self.state
            .lock()
            .sessions
            .retain(|_, s| s.member_id != member_id);
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for InMemoryStore {
    async fn publish(&self, channel: EventChannel, event: &DomainEvent) -> RepoResult<u64> {
        self.state.lock().events.push((channel, event.clone()));
        Ok(0)
    }
}

/// Generator that produces one step per week, or fails on demand
#[derive(Default)]
pub(crate) struct FakeGenerator {
    fail: AtomicBool,
}

impl FakeGenerator {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RoadmapGenerator for FakeGenerator {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn generate(&self, spec: &RoadmapSpec) -> Result<Vec<RoadmapStep>, DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::RoadmapGenerationFailed(
                "upstream unavailable".to_string(),
            ));
        }
        Ok((1..=spec.weeks)
            .map(|week| RoadmapStep {
                order: week,
                title: format!("{} week {week}", spec.topic),
                description: String::new(),
                resources: Vec::new(),
            })
            .collect())
    }
}

// ============================================================================
// Harness
// ============================================================================

pub(crate) struct TestHarness {
    pub store: Arc<InMemoryStore>,
    pub generator: Arc<FakeGenerator>,
    ctx: ServiceContext,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_wallet(WalletConfig::default())
    }

    pub fn with_wallet(wallet: WalletConfig) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let generator = Arc::new(FakeGenerator::default());

        let ctx = ServiceContextBuilder::new()
            .member_repo(store.clone())
            .post_repo(store.clone())
            .comment_repo(store.clone())
            .like_repo(store.clone())
            .chat_repo(store.clone())
            .coupon_repo(store.clone())
            .ledger_repo(store.clone())
            .roadmap_repo(store.clone())
            .session_store(store.clone())
            .publisher(store.clone())
            .roadmap_generator(generator.clone())
            .jwt_service(Arc::new(JwtService::new(
                "test-secret-key-that-is-long-enough",
                1800,
                1_209_600,
            )))
            .id_generator(Arc::new(IdGenerator::new(1)))
            .wallet_config(wallet)
            .build()
            .expect("complete context");

        Self {
            store,
            generator,
            ctx,
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Insert an active local member without a password
    pub async fn seed_member(&self, nickname: &str) -> Member {
        let member = Member::new(
            self.ctx.generate_id(),
            format!("{nickname}@example.com"),
            nickname.to_string(),
        );
        MemberRepository::create(self.store.as_ref(), &member, None)
            .await
            .expect("seed member");
        member
    }

    pub async fn seed_admin(&self, nickname: &str) -> Member {
        let mut member = self.seed_member(nickname).await;
        member.set_roles(Roles::ADMIN);
        MemberRepository::update(self.store.as_ref(), &member)
            .await
            .expect("promote admin");
        member
    }

    /// Credit a balance directly through the ledger
    pub async fn fund(&self, member_id: Id, currency: Currency, amount: i64) {
        let entry = NewLedgerEntry::credit(
            self.ctx.generate_id(),
            member_id,
            currency,
            amount,
            LedgerReason::AdminGrant,
        );
        LedgerRepository::apply(self.store.as_ref(), &[entry])
            .await
            .expect("fund account");
    }

    pub fn balance(&self, member_id: Id, currency: Currency) -> i64 {
        self.store.balance(member_id, currency)
    }
}
