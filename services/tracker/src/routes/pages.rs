//! Public pages and the health check

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use super::page_context;
use crate::error::ServiceError;
use crate::messages::Locale;
use crate::middleware::Principal;
use crate::state::AppState;
use crate::views;

pub async fn home(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    principal: Option<Extension<Principal>>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    let principal = principal.map(|Extension(p)| p);
    let bug_count = match principal {
        Some(_) => Some(state.bugs.count().await?),
        None => None,
    };

    let (jar, ctx) = page_context(locale, principal.as_ref(), jar);
    Ok((jar, views::home(&ctx, bug_count)).into_response())
}

pub async fn about(
    Extension(locale): Extension<Locale>,
    principal: Option<Extension<Principal>>,
    jar: CookieJar,
) -> Response {
    let principal = principal.map(|Extension(p)| p);
    let (jar, ctx) = page_context(locale, principal.as_ref(), jar);
    (jar, views::about(&ctx)).into_response()
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Response {
    match state.db.health_check().await {
        Ok(true) => Json(serde_json::json!({
            "status": "ok",
            "service": "bug-tracker",
            "database": "up"
        }))
        .into_response(),
        outcome => {
            if let Err(e) = outcome {
                error!("Database health check failed: {}", e);
            }
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "degraded",
                    "service": "bug-tracker",
                    "database": "down"
                })),
            )
                .into_response()
        }
    }
}
