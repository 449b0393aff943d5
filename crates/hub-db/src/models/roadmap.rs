//! Roadmap database model

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use hub_core::entities::RoadmapStep;

#[derive(Debug, Clone, FromRow)]
pub struct RoadmapModel {
    pub id: i64,
    pub member_id: i64,
    pub topic: String,
    pub level: String,
    pub weeks: i32,
    pub steps: Json<Vec<RoadmapStep>>,
    pub created_at: DateTime<Utc>,
}
