//! Authentication service
//!
//! Handles signup, login, social login, token refresh and logout.

use hub_common::auth::{hash_password, validate_password_strength, verify_password};
use hub_common::AppError;
use hub_core::{DomainError, Id, Member, OAuthProvider, RefreshSession};
use rand::Rng;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{AuthResponse, LoginRequest, MemberResponse, OAuthLoginRequest, SignupRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const NICKNAME_MIN: usize = 2;
const NICKNAME_MAX: usize = 20;
const NICKNAME_ATTEMPTS: u32 = 20;

/// Emails compare case-insensitively
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a local account and log it in
    #[instrument(skip(self, request), fields(nickname = %request.nickname))]
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password)?;

        let email = normalize_email(&request.email);
        let nickname = request.nickname.trim().to_string();

        if self.ctx.member_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }
        if self.ctx.member_repo().nickname_exists(&nickname).await? {
            return Err(DomainError::NicknameAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;

        let member = Member::new(self.ctx.generate_id(), email, nickname);
        self.ctx
            .member_repo()
            .create(&member, Some(&password_hash))
            .await?;

        info!(member_id = %member.id, "Member signed up");

        self.issue_tokens(&member).await
    }

    /// Login with email and password
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let email = normalize_email(&request.email);

        let member = self
            .ctx
            .member_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                ServiceError::invalid_credentials()
            })?;

        // social accounts have no password to check against
        let password_hash = self
            .ctx
            .member_repo()
            .get_password_hash(member.id)
            .await?
            .ok_or_else(|| {
                warn!(member_id = %member.id, "Login failed: no local password");
                ServiceError::invalid_credentials()
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(member_id = %member.id, "Login failed: invalid password");
            return Err(ServiceError::invalid_credentials());
        }

        member.ensure_can_login().inspect_err(|e| {
            warn!(member_id = %member.id, code = e.code(), "Login rejected");
        })?;

        info!(member_id = %member.id, "Member logged in");

        self.issue_tokens(&member).await
    }

    /// Log in with a profile the provider has already verified, creating the
    /// member on first use.
    #[instrument(skip(self, request), fields(provider = provider.as_str()))]
    pub async fn oauth_login(
        &self,
        provider: OAuthProvider,
        request: OAuthLoginRequest,
    ) -> ServiceResult<AuthResponse> {
        if !provider.is_social() {
            return Err(ServiceError::validation("unsupported OAuth provider"));
        }

        if let Some(member) = self
            .ctx
            .member_repo()
            .find_by_provider(provider, &request.provider_id)
            .await?
        {
            member.ensure_can_login()?;
            info!(member_id = %member.id, "Social member logged in");
            return self.issue_tokens(&member).await;
        }

        let email = normalize_email(&request.email);
        if self.ctx.member_repo().email_exists(&email).await? {
            warn!("Social signup rejected: email belongs to another account");
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let base = request
            .nickname
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| email_local_part(&email), str::to_string);
        let nickname = self.unique_nickname(&base).await?;

        let mut member = Member::social(
            self.ctx.generate_id(),
            email,
            nickname,
            provider,
            request.provider_id,
        );
        member.profile_image = request.profile_image.filter(|url| !url.trim().is_empty());

        self.ctx.member_repo().create(&member, None).await?;

        info!(member_id = %member.id, "Social member signed up");

        self.issue_tokens(&member).await
    }

    /// Rotate a refresh token: the presented token is revoked and a new pair
    /// issued.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> ServiceResult<AuthResponse> {
        let claims = self.ctx.jwt_service().validate_refresh_token(refresh_token)?;
        let member_id = claims.member_id()?;

        let session = self
            .ctx
            .session_store()
            .validate(refresh_token)
            .await?
            .filter(|s| s.member_id == member_id)
            .ok_or_else(|| {
                warn!(member_id = %member_id, "Refresh rejected: token not in store");
                ServiceError::App(AppError::InvalidToken)
            })?;

        self.ctx.session_store().revoke(refresh_token).await?;

        let member = self
            .ctx
            .member_repo()
            .find_by_id(session.member_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;
        member.ensure_can_login()?;

        self.issue_tokens(&member).await
    }

    /// Revoke one refresh token, or every session of the member when none is
    /// given.
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(&self, member_id: Id, refresh_token: Option<&str>) -> ServiceResult<()> {
        match refresh_token {
            Some(token) => {
                // never revoke a token that belongs to someone else
                let owned = self
                    .ctx
                    .session_store()
                    .validate(token)
                    .await?
                    .is_some_and(|s| s.member_id == member_id);
                if owned {
                    self.ctx.session_store().revoke(token).await?;
                }
            }
            None => self.ctx.session_store().revoke_all(member_id).await?,
        }

        info!(member_id = %member_id, "Member logged out");
        Ok(())
    }

    /// Resolve the member behind a valid access token
    ///
    /// Access tokens outlive a suspension or withdrawal, so every
    /// authenticated request re-checks the account status here.
    pub async fn authorize(&self, member_id: Id) -> ServiceResult<Member> {
        let member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        member.ensure_can_login().inspect_err(|e| {
            warn!(member_id = %member_id, code = e.code(), "Access token of inactive member refused");
        })?;
        Ok(member)
    }

    async fn issue_tokens(&self, member: &Member) -> ServiceResult<AuthResponse> {
        let session_id = Uuid::new_v4().to_string();
        let pair = self
            .ctx
            .jwt_service()
            .generate_token_pair(member.id, &session_id)?;

        self.ctx
            .session_store()
            .store(&pair.refresh_token, &RefreshSession::new(member.id, session_id))
            .await?;

        Ok(AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            refresh_expires_in: pair.refresh_expires_in,
            member: MemberResponse::from(member),
        })
    }

    /// `base` if free, else `base` plus a numeric suffix, trimmed to fit
    async fn unique_nickname(&self, base: &str) -> ServiceResult<String> {
        let mut base: String = base.chars().take(NICKNAME_MAX).collect();
        if base.chars().count() < NICKNAME_MIN {
            base = format!("member{base}");
        }

        if !self.ctx.member_repo().nickname_exists(&base).await? {
            return Ok(base);
        }

        for attempt in 1..=NICKNAME_ATTEMPTS {
            let suffix = if attempt < NICKNAME_ATTEMPTS {
                attempt.to_string()
            } else {
                rand::thread_rng().gen_range(1000..100_000).to_string()
            };
            let stem: String = base.chars().take(NICKNAME_MAX - suffix.len()).collect();
            let candidate = format!("{stem}{suffix}");
            if !self.ctx.member_repo().nickname_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(ServiceError::conflict("could not derive a free nickname"))
    }
}

fn email_local_part(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}
