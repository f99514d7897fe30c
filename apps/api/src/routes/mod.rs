pub mod health;


use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::contact;
use crate::content::handlers as content;
use crate::errors::AppError;
use crate::site;
use crate::state::AppState;

/// Largest accepted resume upload.
const RESUME_MAX_BYTES: usize = 10 * 1024 * 1024;

async fn get_or_post_only(method: Method) -> AppError {
    AppError::MethodNotAllowed {
        method: method.to_string(),
        allow: "GET, POST",
    }
}

async fn get_only(method: Method) -> AppError {
    AppError::MethodNotAllowed {
        method: method.to_string(),
        allow: "GET",
    }
}

async fn post_only(method: Method) -> AppError {
    AppError::MethodNotAllowed {
        method: method.to_string(),
        allow: "POST",
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public
        .route("/api/site", get(site::handle_site))
        .route(
            "/api/projects/:slug",
            get(content::get_project).fallback(get_only),
        )
        .route(
            "/api/contact",
            post(contact::handle_contact).fallback(post_only),
        )
        // Admin session
        .route("/admin", get(auth::handle_dashboard))
        .route("/api/admin/login", post(auth::handle_login).fallback(post_only))
        .route(
            "/api/admin/magic-link",
            post(auth::handle_magic_link).fallback(post_only),
        )
        .route(
            "/api/admin/logout",
            post(auth::handle_logout).fallback(post_only),
        )
        // Content: GET is public, POST replaces the section (admin only)
        .route(
            "/api/admin/hero",
            get(content::get_hero)
                .post(content::post_hero)
                .fallback(get_or_post_only),
        )
        .route(
            "/api/admin/about",
            get(content::get_about)
                .post(content::post_about)
                .fallback(get_or_post_only),
        )
        .route(
            "/api/admin/experience",
            get(content::get_experience)
                .post(content::post_experience)
                .fallback(get_or_post_only),
        )
        .route(
            "/api/admin/skills",
            get(content::get_skills)
                .post(content::post_skills)
                .fallback(get_or_post_only),
        )
        .route(
            "/api/admin/projects",
            get(content::get_projects)
                .post(content::post_projects)
                .fallback(get_or_post_only),
        )
        .route(
            "/api/admin/education",
            get(content::get_education)
                .post(content::post_education)
                .fallback(get_or_post_only),
        )
        .route(
            "/api/admin/collaborations",
            get(content::get_collaborations)
                .post(content::post_collaborations)
                .fallback(get_or_post_only),
        )
        .route(
            "/api/admin/contact-info",
            get(content::get_contact_info)
                .post(content::post_contact_info)
                .fallback(get_or_post_only),
        )
        .route(
            "/api/admin/resume",
            get(content::get_resume)
                .post(content::post_resume)
                .fallback(get_or_post_only),
        )
        .route(
            "/api/admin/uploadResume",
            post(content::upload_resume)
                .fallback(post_only)
                .layer(DefaultBodyLimit::max(RESUME_MAX_BYTES)),
        )
        .with_state(state)
}
