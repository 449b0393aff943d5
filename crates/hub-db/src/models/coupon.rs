//! Coupon database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CouponModel {
    pub id: i64,
    pub code: String,
    pub currency: String,
    pub amount: i64,
    pub expires_at: DateTime<Utc>,
    pub member_id: Option<i64>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
