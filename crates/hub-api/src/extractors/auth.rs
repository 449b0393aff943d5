//! Authentication extractors
//!
//! The access token is read from the `Authorization: Bearer` header, falling
//! back to the `access_token` cookie set in production.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use hub_core::{DomainError, Id, Member};
use hub_service::AuthService;

use crate::response::ApiError;
use crate::state::AppState;

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Raw access token from the header or the cookie, if any
async fn access_token<S>(parts: &mut Parts, state: &S) -> Option<String>
where
    S: Send + Sync,
{
    if let Ok(TypedHeader(Authorization(bearer))) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
    {
        return Some(bearer.token().to_string());
    }

    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate the token, then re-check the account behind it
///
/// Suspended and withdrawn members are refused even while their access
/// token has not expired.
async fn authenticate(state: &AppState, token: &str) -> Result<Member, ApiError> {
    let claims = state.jwt_service().validate_access_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        e
    })?;
    let member = AuthService::new(state.service_context())
        .authorize(claims.member_id()?)
        .await?;
    Ok(member)
}

/// Authenticated member extracted from the access token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub member_id: Id,
}

impl AuthUser {
    pub fn new(member_id: Id) -> Self {
        Self { member_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = access_token(parts, state)
            .await
            .ok_or(ApiError::MissingAuth)?;
        let member = authenticate(&AppState::from_ref(state), &token).await?;
        Ok(Self::new(member.id))
    }
}

/// Optional authenticated member
///
/// None when no token is present; an invalid token is still an error.
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn member_id(&self) -> Option<Id> {
        self.0.map(|u| u.member_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match access_token(parts, state).await {
            Some(token) => {
                let member = authenticate(&AppState::from_ref(state), &token).await?;
                Ok(Self(Some(AuthUser::new(member.id))))
            }
            None => Ok(Self(None)),
        }
    }
}

/// Authenticated member holding the ADMIN role with an ACTIVE account
#[derive(Debug, Clone, Copy)]
pub struct AdminUser {
    pub member_id: Id,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = access_token(parts, state)
            .await
            .ok_or(ApiError::MissingAuth)?;
        let member = authenticate(&AppState::from_ref(state), &token).await?;

        if member.is_admin() {
            Ok(Self {
                member_id: member.id,
            })
        } else {
            tracing::warn!(member_id = %member.id, "Admin endpoint refused");
            Err(DomainError::AdminRequired.into())
        }
    }
}
