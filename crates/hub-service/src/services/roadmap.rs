//! Roadmap service - paid, generator-backed study plans
//!
//! Generation charges tickets up front. When the generator or the save
//! fails the charge is refunded, so a member only pays for roadmaps they got.

use chrono::Utc;
use hub_core::events::RoadmapGeneratedEvent;
use hub_core::{
    DomainError, DomainEvent, EventChannel, Id, LedgerReason, Page, PageRequest, Roadmap,
    RoadmapSpec,
};
use tracing::{error, info, instrument, warn};

use crate::dto::{GenerateRoadmapRequest, RoadmapResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::wallet::WalletService;

pub struct RoadmapService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoadmapService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(level = request.level.as_str(), weeks = request.weeks))]
    pub async fn generate(
        &self,
        member_id: Id,
        request: GenerateRoadmapRequest,
    ) -> ServiceResult<RoadmapResponse> {
        let topic = request.topic.trim().to_string();
        if !(2..=100).contains(&topic.chars().count()) {
            return Err(ServiceError::validation("Topic must be 2-100 characters"));
        }
        if !(1..=52).contains(&request.weeks) {
            return Err(ServiceError::validation("Weeks must be 1-52"));
        }

        let spec = RoadmapSpec {
            topic,
            level: request.level,
            weeks: request.weeks,
        };
        let roadmap_id = self.ctx.generate_id();
        let reference = roadmap_id.to_string();
        let cost = self.ctx.wallet_config().roadmap_ticket_cost;
        let wallet = WalletService::new(self.ctx);

        if cost > 0 {
            wallet
                .use_tickets(member_id, cost, LedgerReason::RoadmapGeneration, &reference)
                .await?;
        }

        let roadmap = match self.build(roadmap_id, member_id, &spec).await {
            Ok(roadmap) => roadmap,
            Err(e) => {
                warn!(
                    member_id = %member_id,
                    generator = self.ctx.roadmap_generator().name(),
                    error = %e,
                    "Roadmap generation failed, refunding"
                );
                if cost > 0 {
                    if let Err(refund) = wallet
                        .refund_tickets(member_id, cost, LedgerReason::RoadmapRefund, &reference)
                        .await
                    {
                        error!(member_id = %member_id, error = %refund, "Roadmap refund failed");
                    }
                }
                return Err(match e.as_domain() {
                    Some(DomainError::RoadmapGenerationFailed(_)) => e,
                    _ => DomainError::RoadmapGenerationFailed(e.to_string()).into(),
                });
            }
        };

        self.ctx
            .publish(
                EventChannel::Member(member_id),
                DomainEvent::RoadmapGenerated(RoadmapGeneratedEvent {
                    roadmap_id,
                    member_id,
                    timestamp: Utc::now(),
                }),
            )
            .await;

        info!(
            roadmap_id = %roadmap_id,
            member_id = %member_id,
            steps = roadmap.steps.len(),
            "Roadmap generated"
        );
        Ok(RoadmapResponse::from(roadmap))
    }

    async fn build(&self, id: Id, member_id: Id, spec: &RoadmapSpec) -> ServiceResult<Roadmap> {
        let steps = self.ctx.roadmap_generator().generate(spec).await?;
        if steps.is_empty() {
            return Err(DomainError::RoadmapGenerationFailed("no steps returned".to_string()).into());
        }

        let weeks = i32::try_from(spec.weeks)
            .map_err(|_| ServiceError::validation("Weeks must be 1-52"))?;
        let roadmap = Roadmap::new(id, member_id, spec.topic.clone(), spec.level, weeks, steps);
        self.ctx.roadmap_repo().create(&roadmap).await?;
        Ok(roadmap)
    }

    async fn load_own(&self, member_id: Id, roadmap_id: Id) -> ServiceResult<Roadmap> {
        let roadmap = self
            .ctx
            .roadmap_repo()
            .find_by_id(roadmap_id)
            .await?
            .ok_or(DomainError::RoadmapNotFound(roadmap_id))?;
        if !roadmap.is_owner(member_id) {
            return Err(DomainError::NotRoadmapOwner.into());
        }
        Ok(roadmap)
    }

    pub async fn list_mine(
        &self,
        member_id: Id,
        page: PageRequest,
    ) -> ServiceResult<Page<RoadmapResponse>> {
        let roadmaps = self.ctx.roadmap_repo().list_by_member(member_id, page).await?;
        Ok(roadmaps.map(RoadmapResponse::from))
    }

    pub async fn get(&self, member_id: Id, roadmap_id: Id) -> ServiceResult<RoadmapResponse> {
        self.load_own(member_id, roadmap_id)
            .await
            .map(RoadmapResponse::from)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, member_id: Id, roadmap_id: Id) -> ServiceResult<()> {
        self.load_own(member_id, roadmap_id).await?;
        self.ctx.roadmap_repo().delete(roadmap_id).await?;
        info!(roadmap_id = %roadmap_id, "Roadmap deleted");
        Ok(())
    }
}
