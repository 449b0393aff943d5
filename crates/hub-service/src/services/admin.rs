//! Admin service - member moderation
//!
//! Callers are checked for the ADMIN role at the HTTP boundary; these
//! operations only guard against admins acting on themselves.

use hub_core::{DomainError, Id, MemberStatus, Page, PageRequest};
use tracing::{info, instrument};

use crate::dto::{ChangeRolesRequest, ChangeStatusRequest, MemberResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::member::MemberService;
use super::post::PostService;

pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn list_members(
        &self,
        status: Option<MemberStatus>,
        page: PageRequest,
    ) -> ServiceResult<Page<MemberResponse>> {
        let members = self.ctx.member_repo().list(status, page).await?;
        Ok(members.map(|m| MemberResponse::from(&m)))
    }

    /// Suspend or reactivate a member. Suspension ends every session.
    #[instrument(skip(self, request), fields(status = request.status.as_str()))]
    pub async fn change_status(
        &self,
        admin_id: Id,
        member_id: Id,
        request: ChangeStatusRequest,
    ) -> ServiceResult<MemberResponse> {
        if admin_id == member_id {
            return Err(DomainError::CannotModifySelf.into());
        }

        let mut member = MemberService::new(self.ctx).load(member_id).await?;
        member.change_status(request.status)?;
        self.ctx.member_repo().update(&member).await?;

        if member.status == MemberStatus::Suspended {
            self.ctx.session_store().revoke_all(member_id).await?;
        }

        info!(admin_id = %admin_id, member_id = %member_id, "Member status changed");
        Ok(MemberResponse::from(&member))
    }

    #[instrument(skip(self, request))]
    pub async fn change_roles(
        &self,
        admin_id: Id,
        member_id: Id,
        request: ChangeRolesRequest,
    ) -> ServiceResult<MemberResponse> {
        if admin_id == member_id {
            return Err(DomainError::CannotModifySelf.into());
        }

        let mut member = MemberService::new(self.ctx).load(member_id).await?;
        if member.status == MemberStatus::Withdrawn {
            return Err(DomainError::MemberWithdrawn.into());
        }
        member.set_roles(request.roles);
        self.ctx.member_repo().update(&member).await?;

        info!(admin_id = %admin_id, member_id = %member_id, admin = member.is_admin(), "Member roles changed");
        Ok(MemberResponse::from(&member))
    }

    pub async fn delete_post(&self, admin_id: Id, post_id: Id) -> ServiceResult<()> {
        PostService::new(self.ctx).delete_as_admin(admin_id, post_id).await
    }
}
