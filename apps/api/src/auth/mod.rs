//! Admin gate: a request is an admin request when it carries an access token
//! the identity provider accepts, for an email listed in `admin_users`.

pub mod handlers;
pub mod identity;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Cookie carrying the access token for browser sessions.
pub const SESSION_COOKIE: &str = "sb-access-token";

/// Bearer token from `Authorization`, falling back to the session cookie.
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value storing a session token.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value clearing the session token.
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0")
}

/// Authenticated administrator. Use as an extractor on any handler that
/// mutates content.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub access_token: String,
}

/// Verifies `token` with the identity provider and checks the admin list.
pub async fn authorize_admin(state: &AppState, token: &str) -> Result<AdminUser, AppError> {
    let user = state
        .identity
        .get_user(token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unauthorized: Invalid token".to_string()))?;

    let email = user
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Unauthorized: Invalid token".to_string()))?;

    if !state.store.is_admin(&email).await? {
        tracing::warn!("Rejected non-admin user {email}");
        return Err(AppError::Forbidden(
            "Forbidden: Admin access required".to_string(),
        ));
    }

    Ok(AdminUser {
        id: user.id,
        email,
        access_token: token.to_string(),
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = access_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Unauthorized: No auth token".to_string()))?;
        authorize_admin(state, &token).await
    }
}
