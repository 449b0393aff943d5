//! Member database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the members table (password hash excluded)
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub status: String,
    pub roles: i32,
    pub provider: String,
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
