use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::identity::IdentityError;
use crate::auth::{access_token, expired_session_cookie, session_cookie, AdminUser};
use crate::content::validation::is_email;
use crate::errors::AppError;
use crate::state::AppState;

/// Editable sections, in dashboard tab order.
pub const DASHBOARD_SECTIONS: &[&str] = &[
    "hero",
    "about",
    "experience",
    "skills",
    "projects",
    "education",
    "collaborations",
    "resume",
    "contact-info",
];

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct MagicLinkRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: SessionUser,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Serialize)]
pub struct DashboardView {
    pub title: &'static str,
    pub user: SessionUser,
    pub sections: &'static [&'static str],
    pub active_section: &'static str,
    pub logout: &'static str,
}

/// Provider rejections are the caller's problem; transport failures are ours.
fn rejected_as(err: IdentityError, wrap: fn(String) -> AppError) -> AppError {
    match err {
        IdentityError::Rejected { message, .. } => wrap(message),
        other => AppError::Identity(other),
    }
}

/// POST /api/admin/login
pub async fn handle_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let session = state
        .identity
        .sign_in_with_password(email, &req.password)
        .await
        .map_err(|e| rejected_as(e, AppError::Unauthorized))?;

    let user_email = session.user.email.clone().unwrap_or_default();
    if user_email.is_empty() || !state.store.is_admin(&user_email).await? {
        if let Err(e) = state.identity.sign_out(&session.access_token).await {
            warn!("Failed to revoke non-admin session: {e}");
        }
        return Err(AppError::Forbidden(
            "Forbidden: Admin access required".to_string(),
        ));
    }

    info!("Admin {user_email} signed in");

    let cookie = session_cookie(&session.access_token, session.expires_in.max(0));
    let body = LoginResponse {
        user: SessionUser {
            id: session.user.id,
            email: user_email,
        },
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        expires_in: session.expires_in,
    };
    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Json(body)).into_response())
}

/// POST /api/admin/magic-link
pub async fn handle_magic_link(
    State(state): State<AppState>,
    payload: Result<Json<MagicLinkRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(req) = payload?;
    let email = req.email.trim();
    if !is_email(email) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    let redirect = state.config.admin_redirect_url();
    state
        .identity
        .send_magic_link(email, redirect.as_deref())
        .await
        .map_err(|e| rejected_as(e, AppError::BadRequest))?;

    info!("Magic link requested for {email}");
    Ok(Json(json!({ "ok": true })))
}

/// POST /api/admin/logout
pub async fn handle_logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = access_token(&headers) {
        if let Err(e) = state.identity.sign_out(&token).await {
            warn!("Sign-out at identity provider failed: {e}");
        }
    }
    (
        AppendHeaders([(header::SET_COOKIE, expired_session_cookie())]),
        Json(json!({ "ok": true })),
    )
        .into_response()
}

/// GET /admin
/// Anyone without a valid admin session is sent back to the home page.
pub async fn handle_dashboard(admin: Option<AdminUser>) -> Response {
    match admin {
        Some(admin) => Json(DashboardView {
            title: "Admin Dashboard",
            user: SessionUser {
                id: admin.id,
                email: admin.email,
            },
            sections: DASHBOARD_SECTIONS,
            active_section: DASHBOARD_SECTIONS[0],
            logout: "/api/admin/logout",
        })
        .into_response(),
        None => Redirect::to("/").into_response(),
    }
}
