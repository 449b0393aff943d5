//! Post database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub author_id: i64,
    pub category: String,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Post joined with its author's nickname and aggregate counts
#[derive(Debug, Clone, FromRow)]
pub struct PostViewModel {
    #[sqlx(flatten)]
    pub post: PostModel,
    pub author_nickname: String,
    pub like_count: i64,
    pub comment_count: i64,
}
