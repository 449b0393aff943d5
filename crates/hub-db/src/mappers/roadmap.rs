//! Roadmap model -> entity

use hub_core::entities::{Roadmap, RoadmapLevel};
use hub_core::error::DomainError;
use hub_core::value_objects::Id;

use super::parse_column;
use crate::models::RoadmapModel;

impl TryFrom<RoadmapModel> for Roadmap {
    type Error = DomainError;

    fn try_from(model: RoadmapModel) -> Result<Self, Self::Error> {
        Ok(Roadmap {
            id: Id::new(model.id),
            member_id: Id::new(model.member_id),
            topic: model.topic,
            level: parse_column("level", &model.level, RoadmapLevel::parse)?,
            weeks: model.weeks,
            steps: model.steps.0,
            created_at: model.created_at,
        })
    }
}
