//! Member service - the member's own page and public profiles

use hub_common::auth::{hash_password, validate_password_strength, verify_password};
use hub_core::{DomainError, Id, Member, MemberStatus, Page, PageRequest, PostQuery};
use tracing::{info, instrument, warn};

use crate::dto::{
    BalanceResponse, ChangePasswordRequest, MemberResponse, MyCommentResponse, MyPageResponse,
    NicknameCheckResponse, PostResponse, PublicMemberResponse, UpdateProfileRequest,
    WithdrawRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct MemberService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemberService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a member or fail with `MEMBER_NOT_FOUND`
    pub(crate) async fn load(&self, member_id: Id) -> ServiceResult<Member> {
        self.ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| DomainError::MemberNotFound(member_id).into())
    }

    #[instrument(skip(self))]
    pub async fn get_me(&self, member_id: Id) -> ServiceResult<MyPageResponse> {
        let member = self.load(member_id).await?;
        let accounts = self.ctx.ledger_repo().balances(member_id).await?;

        Ok(MyPageResponse {
            member: MemberResponse::from(&member),
            balances: BalanceResponse::from(accounts.as_slice()),
        })
    }

    /// Public profile; withdrawn members are hidden
    #[instrument(skip(self))]
    pub async fn get_member(&self, member_id: Id) -> ServiceResult<PublicMemberResponse> {
        let member = self.load(member_id).await?;
        if member.status == MemberStatus::Withdrawn {
            return Err(DomainError::MemberNotFound(member_id).into());
        }
        Ok(PublicMemberResponse::from(&member))
    }

    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        member_id: Id,
        request: UpdateProfileRequest,
    ) -> ServiceResult<MemberResponse> {
        let mut member = self.load(member_id).await?;

        if let Some(nickname) = request.nickname.map(|n| n.trim().to_string()) {
            if nickname != member.nickname {
                if self.ctx.member_repo().nickname_exists(&nickname).await? {
                    return Err(DomainError::NicknameAlreadyExists.into());
                }
                member.set_nickname(nickname);
            }
        }

        if let Some(image) = request.profile_image {
            let image = image.trim();
            member.set_profile_image((!image.is_empty()).then(|| image.to_string()));
        }

        self.ctx.member_repo().update(&member).await?;

        info!(member_id = %member_id, "Profile updated");
        Ok(MemberResponse::from(&member))
    }

    pub async fn check_nickname(&self, nickname: &str) -> ServiceResult<NicknameCheckResponse> {
        let nickname = nickname.trim();
        let length = nickname.chars().count();
        if !(2..=20).contains(&length) {
            return Err(ServiceError::validation("Nickname must be 2-20 characters"));
        }

        let taken = self.ctx.member_repo().nickname_exists(nickname).await?;
        Ok(NicknameCheckResponse {
            nickname: nickname.to_string(),
            available: !taken,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        member_id: Id,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        let member = self.load(member_id).await?;
        if member.provider.is_social() {
            return Err(DomainError::PasswordNotSet.into());
        }

        let current_hash = self
            .ctx
            .member_repo()
            .get_password_hash(member_id)
            .await?
            .ok_or(DomainError::PasswordNotSet)?;

        if !verify_password(&request.current_password, &current_hash)? {
            warn!(member_id = %member_id, "Password change rejected: wrong current password");
            return Err(ServiceError::invalid_credentials());
        }

        validate_password_strength(&request.new_password)?;
        let new_hash = hash_password(&request.new_password)?;
        self.ctx
            .member_repo()
            .update_password(member_id, &new_hash)
            .await?;

        info!(member_id = %member_id, "Password changed");
        Ok(())
    }

    /// Withdraw the account. Local accounts must confirm their password.
    #[instrument(skip(self, request))]
    pub async fn withdraw(&self, member_id: Id, request: WithdrawRequest) -> ServiceResult<()> {
        let mut member = self.load(member_id).await?;

        if !member.provider.is_social() {
            let password = request
                .password
                .ok_or_else(|| ServiceError::validation("password is required"))?;
            let hash = self
                .ctx
                .member_repo()
                .get_password_hash(member_id)
                .await?
                .ok_or(DomainError::PasswordNotSet)?;
            if !verify_password(&password, &hash)? {
                warn!(member_id = %member_id, "Withdrawal rejected: wrong password");
                return Err(ServiceError::invalid_credentials());
            }
        }

        member.withdraw();
        self.ctx.member_repo().update(&member).await?;
        self.ctx.session_store().revoke_all(member_id).await?;

        info!(member_id = %member_id, "Member withdrew");
        Ok(())
    }

    pub async fn my_posts(&self, member_id: Id, page: PageRequest) -> ServiceResult<Page<PostResponse>> {
        let query = PostQuery {
            author_id: Some(member_id),
            ..PostQuery::default()
        };
        let posts = self.ctx.post_repo().list(&query, page).await?;
        Ok(posts.map(PostResponse::from))
    }

    pub async fn my_comments(
        &self,
        member_id: Id,
        page: PageRequest,
    ) -> ServiceResult<Page<MyCommentResponse>> {
        let comments = self.ctx.comment_repo().list_by_author(member_id, page).await?;
        Ok(comments.map(|c| MyCommentResponse::from(&c)))
    }

    pub async fn my_liked_posts(
        &self,
        member_id: Id,
        page: PageRequest,
    ) -> ServiceResult<Page<PostResponse>> {
        let posts = self.ctx.post_repo().list_liked_by(member_id, page).await?;
        Ok(posts.map(PostResponse::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{LoginRequest, SignupRequest};
    use crate::services::AuthService;
    use crate::testing::{TestHarness, TEST_PASSWORD};
    use hub_core::Currency;

    async fn signup(h: &TestHarness, nickname: &str) -> Id {
        AuthService::new(h.context())
            .signup(SignupRequest {
                email: format!("{nickname}@example.com"),
                password: TEST_PASSWORD.to_string(),
                nickname: nickname.to_string(),
            })
            .await
            .unwrap()
            .member
            .id
    }

    #[tokio::test]
    async fn test_get_me_includes_balances() {
        let h = TestHarness::new();
        let member = h.seed_member("alice").await;
        h.fund(member.id, Currency::Token, 40).await;

        let me = MemberService::new(h.context()).get_me(member.id).await.unwrap();
        assert_eq!(me.member.nickname, "alice");
        assert_eq!(me.balances.token, 40);
        assert_eq!(me.balances.ticket, 0);
    }

    #[tokio::test]
    async fn test_update_profile_nickname_rules() {
        let h = TestHarness::new();
        let alice = h.seed_member("alice").await;
        h.seed_member("bob").await;
        let service = MemberService::new(h.context());

        // keeping your own nickname is fine
        let same = UpdateProfileRequest {
            nickname: Some("alice".into()),
            profile_image: Some("https://img/a.png".into()),
        };
        let updated = service.update_profile(alice.id, same).await.unwrap();
        assert_eq!(updated.profile_image.as_deref(), Some("https://img/a.png"));

        let taken = UpdateProfileRequest {
            nickname: Some("bob".into()),
            profile_image: None,
        };
        let err = service.update_profile(alice.id, taken).await.unwrap_err();
        assert_eq!(err.error_code(), "NICKNAME_ALREADY_EXISTS");

        let clear = UpdateProfileRequest {
            nickname: Some("alicia".into()),
            profile_image: Some(String::new()),
        };
        let updated = service.update_profile(alice.id, clear).await.unwrap();
        assert_eq!(updated.nickname, "alicia");
        assert!(updated.profile_image.is_none());
    }

    #[tokio::test]
    async fn test_check_nickname() {
        let h = TestHarness::new();
        h.seed_member("alice").await;
        let service = MemberService::new(h.context());

        assert!(!service.check_nickname("alice").await.unwrap().available);
        assert!(service.check_nickname("carol").await.unwrap().available);
        assert!(service.check_nickname("a").await.is_err());
    }

    #[tokio::test]
    async fn test_change_password() {
        let h = TestHarness::new();
        let member_id = signup(&h, "alice").await;
        let service = MemberService::new(h.context());

        let wrong = ChangePasswordRequest {
            current_password: "Nope12345".into(),
            new_password: "NewPassword1".into(),
        };
        let err = service.change_password(member_id, wrong).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CREDENTIALS");

        let ok = ChangePasswordRequest {
            current_password: TEST_PASSWORD.into(),
            new_password: "NewPassword1".into(),
        };
        service.change_password(member_id, ok).await.unwrap();

        AuthService::new(h.context())
            .login(LoginRequest {
                email: "alice@example.com".into(),
                password: "NewPassword1".into(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_withdraw_requires_password_and_revokes_sessions() {
        let h = TestHarness::new();
        let member_id = signup(&h, "alice").await;
        let service = MemberService::new(h.context());

        let err = service
            .withdraw(member_id, WithdrawRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        service
            .withdraw(
                member_id,
                WithdrawRequest {
                    password: Some(TEST_PASSWORD.into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(h.store.member(member_id).unwrap().status, MemberStatus::Withdrawn);
        assert_eq!(h.store.session_count(member_id), 0);

        let err = service.get_member(member_id).await.unwrap_err();
        assert_eq!(err.error_code(), "MEMBER_NOT_FOUND");

        // the email and nickname are free again
        signup(&h, "alice").await;
    }
}
