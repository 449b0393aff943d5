//! Non-relational ports: refresh sessions, event delivery, roadmap generation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{RoadmapLevel, RoadmapStep};
use crate::error::DomainError;
use crate::events::{DomainEvent, EventChannel};
use crate::traits::RepoResult;
use crate::value_objects::Id;

/// Server-side record of an issued refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    pub member_id: Id,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

impl RefreshSession {
    pub fn new(member_id: Id, session_id: String) -> Self {
        Self {
            member_id,
            session_id,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn store(&self, token: &str, session: &RefreshSession) -> RepoResult<()>;

    /// Session for a token that has not been revoked or expired
    async fn validate(&self, token: &str) -> RepoResult<Option<RefreshSession>>;

    async fn revoke(&self, token: &str) -> RepoResult<()>;

    async fn revoke_all(&self, member_id: Id) -> RepoResult<()>;
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Returns the number of subscribers that received the event
    async fn publish(&self, channel: EventChannel, event: &DomainEvent) -> RepoResult<u64>;
}

/// What the member asked a roadmap for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapSpec {
    pub topic: String,
    pub level: RoadmapLevel,
    pub weeks: u32,
}

#[async_trait]
pub trait RoadmapGenerator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Fails with `RoadmapGenerationFailed` when no usable plan came back
    async fn generate(&self, spec: &RoadmapSpec) -> Result<Vec<RoadmapStep>, DomainError>;
}
