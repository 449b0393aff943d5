//! Like service

use hub_core::{DomainError, Id, PostLike};
use tracing::{debug, instrument};

use crate::dto::LikeResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::post::PostService;

pub struct LikeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LikeService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn like(&self, member_id: Id, post_id: Id) -> ServiceResult<LikeResponse> {
        PostService::new(self.ctx).load(post_id).await?;
        self.ctx
            .like_repo()
            .create(&PostLike::new(post_id, member_id))
            .await?;

        debug!(post_id = %post_id, member_id = %member_id, "Post liked");
        self.response(post_id, true).await
    }

    #[instrument(skip(self))]
    pub async fn unlike(&self, member_id: Id, post_id: Id) -> ServiceResult<LikeResponse> {
        PostService::new(self.ctx).load(post_id).await?;
        if !self.ctx.like_repo().delete(post_id, member_id).await? {
            return Err(DomainError::LikeNotFound.into());
        }

        debug!(post_id = %post_id, member_id = %member_id, "Post unliked");
        self.response(post_id, false).await
    }

    async fn response(&self, post_id: Id, liked: bool) -> ServiceResult<LikeResponse> {
        let like_count = self
            .ctx
            .post_repo()
            .find_view(post_id)
            .await?
            .map_or(0, |v| v.like_count);
        Ok(LikeResponse {
            post_id,
            liked,
            like_count,
        })
    }
}
