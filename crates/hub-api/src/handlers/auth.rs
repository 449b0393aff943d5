//! Authentication handlers
//!
//! Endpoints for signup, login, social login, logout, and token refresh.
//! When cookie auth is enabled the token pair is also set as HttpOnly cookies.

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use hub_common::CookieConfig;
use hub_core::OAuthProvider;
use hub_service::dto::{
    AuthResponse, LoginRequest, LogoutRequest, OAuthLoginRequest, RefreshTokenRequest,
    SignupRequest,
};
use hub_service::AuthService;

use crate::extractors::{AuthUser, ValidatedJson, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

fn token_cookie(
    config: &CookieConfig,
    name: &'static str,
    value: String,
    max_age_secs: i64,
) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build();
    if let Some(domain) = &config.domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}

/// Attach the token pair as cookies when cookie auth is enabled
fn with_token_cookies(state: &AppState, jar: CookieJar, response: &AuthResponse) -> CookieJar {
    let config = &state.config().cookie;
    if !config.enabled {
        return jar;
    }
    jar.add(token_cookie(
        config,
        ACCESS_TOKEN_COOKIE,
        response.access_token.clone(),
        response.expires_in,
    ))
    .add(token_cookie(
        config,
        REFRESH_TOKEN_COOKIE,
        response.refresh_token.clone(),
        response.refresh_expires_in,
    ))
}

/// Expire both token cookies
pub(crate) fn clear_token_cookies(state: &AppState, jar: CookieJar) -> CookieJar {
    let config = &state.config().cookie;
    if !config.enabled {
        return jar;
    }
    jar.remove(token_cookie(config, ACCESS_TOKEN_COOKIE, String::new(), 0))
        .remove(token_cookie(config, REFRESH_TOKEN_COOKIE, String::new(), 0))
}

/// Register a local account
///
/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiResult<Created<(CookieJar, Json<AuthResponse>)>> {
    let response = AuthService::new(state.service_context()).signup(request).await?;
    let jar = with_token_cookies(&state, jar, &response);
    Ok(Created((jar, Json(response))))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let response = AuthService::new(state.service_context()).login(request).await?;
    let jar = with_token_cookies(&state, jar, &response);
    Ok((jar, Json(response)))
}

/// Login or register with a profile verified by a social provider
///
/// POST /auth/oauth/{provider}
pub async fn oauth_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<OAuthLoginRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let provider = OAuthProvider::parse(&provider)
        .filter(OAuthProvider::is_social)
        .ok_or_else(|| ApiError::invalid_path(format!("Unsupported provider: {provider}")))?;

    let response = AuthService::new(state.service_context())
        .oauth_login(provider, request)
        .await?;
    let jar = with_token_cookies(&state, jar, &response);
    Ok((jar, Json(response)))
}

/// Rotate the refresh token; the body wins over the cookie
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let token = body
        .and_then(|Json(b)| b.refresh_token)
        .or_else(|| jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string()))
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingAuth)?;

    let response = AuthService::new(state.service_context())
        .refresh(&token)
        .await?;
    let jar = with_token_cookies(&state, jar, &response);
    Ok((jar, Json(response)))
}

/// Revoke one refresh token, or every session when none is given
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    body: Option<Json<LogoutRequest>>,
) -> ApiResult<(CookieJar, NoContent)> {
    let token = body
        .and_then(|Json(b)| b.refresh_token)
        .or_else(|| jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string()))
        .filter(|t| !t.is_empty());

    AuthService::new(state.service_context())
        .logout(auth.member_id, token.as_deref())
        .await?;
    Ok((clear_token_cookies(&state, jar), NoContent))
}
