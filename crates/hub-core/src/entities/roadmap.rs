//! Roadmap entity - a generated study plan

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoadmapLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl RoadmapLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "BEGINNER",
            Self::Intermediate => "INTERMEDIATE",
            Self::Advanced => "ADVANCED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "BEGINNER" => Some(Self::Beginner),
            "INTERMEDIATE" => Some(Self::Intermediate),
            "ADVANCED" => Some(Self::Advanced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub order: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roadmap {
    pub id: Id,
    pub member_id: Id,
    pub topic: String,
    pub level: RoadmapLevel,
    pub weeks: i32,
    pub steps: Vec<RoadmapStep>,
    pub created_at: DateTime<Utc>,
}

impl Roadmap {
    pub fn new(
        id: Id,
        member_id: Id,
        topic: String,
        level: RoadmapLevel,
        weeks: i32,
        mut steps: Vec<RoadmapStep>,
    ) -> Self {
        steps.sort_by_key(|s| s.order);
        Self {
            id,
            member_id,
            topic,
            level,
            weeks,
            steps,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_owner(&self, member_id: Id) -> bool {
        self.member_id == member_id
    }
}
