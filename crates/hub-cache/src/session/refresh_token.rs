//! Refresh token storage in Redis.
//!
//! Each token is a key with the token's lifetime as TTL. A per-member set
//! indexes the member's tokens so a logout-everywhere can find them.

use async_trait::async_trait;
use hub_core::{Id, RefreshSession, RepoResult, SessionStore};
use redis::AsyncCommands;

use crate::pool::{RedisPool, RedisResult};

const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";
const MEMBER_SESSIONS_PREFIX: &str = "member_sessions:";

/// Matches the default refresh token lifetime (14 days)
const DEFAULT_REFRESH_TOKEN_TTL: u64 = 14 * 24 * 60 * 60;

/// Redis-backed [`SessionStore`]
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self::with_ttl(pool, DEFAULT_REFRESH_TOKEN_TTL)
    }

    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(token: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token}")
    }

    fn member_key(member_id: Id) -> String {
        format!("{MEMBER_SESSIONS_PREFIX}{member_id}")
    }

    async fn store_inner(&self, token: &str, session: &RefreshSession) -> RedisResult<()> {
        self.pool
            .set_json(&Self::key(token), session, self.ttl_seconds)
            .await?;

        let member_key = Self::member_key(session.member_id);
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&member_key, token).await?;
        conn.expire::<_, ()>(&member_key, ttl).await?;

        tracing::debug!(
            member_id = %session.member_id,
            session_id = %session.session_id,
            "Stored refresh token"
        );
        Ok(())
    }

    async fn revoke_inner(&self, token: &str) -> RedisResult<()> {
        if let Some(session) = self.pool.get_json::<RefreshSession>(&Self::key(token)).await? {
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(Self::member_key(session.member_id), token)
                .await?;
        }

        if self.pool.delete(&Self::key(token)).await? {
            tracing::debug!("Revoked refresh token");
        }
        Ok(())
    }

    async fn revoke_all_inner(&self, member_id: Id) -> RedisResult<usize> {
        let member_key = Self::member_key(member_id);
        let mut conn = self.pool.get().await?;

        let tokens: Vec<String> = conn.smembers(&member_key).await?;
        if !tokens.is_empty() {
            let keys: Vec<String> = tokens.iter().map(|t| Self::key(t)).collect();
            conn.del::<_, ()>(keys).await?;
        }
        conn.del::<_, ()>(&member_key).await?;

        tracing::info!(member_id = %member_id, count = tokens.len(), "Revoked all refresh tokens");
        Ok(tokens.len())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn store(&self, token: &str, session: &RefreshSession) -> RepoResult<()> {
        Ok(self.store_inner(token, session).await?)
    }

    async fn validate(&self, token: &str) -> RepoResult<Option<RefreshSession>> {
        Ok(self.pool.get_json(&Self::key(token)).await?)
    }

    async fn revoke(&self, token: &str) -> RepoResult<()> {
        Ok(self.revoke_inner(token).await?)
    }

    async fn revoke_all(&self, member_id: Id) -> RepoResult<()> {
        self.revoke_all_inner(member_id).await?;
        Ok(())
    }
}
