//! Login, logout and self-registration

use std::collections::HashMap;

use axum::{
    Extension, Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{error, info};

use super::{form_errors, page_context, redirect_with};
use crate::error::{AuthError, ServiceError};
use crate::messages::Locale;
use crate::middleware::{Principal, SESSION_COOKIE, clear_session, persistent_cookie};
use crate::models::NewUser;
use crate::state::AppState;
use crate::validation::{self, ValidationErrors};
use crate::views;

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `GET /auth`; `?error` and `?logout` show the matching notice
pub async fn login_page(
    Extension(locale): Extension<Locale>,
    principal: Option<Extension<Principal>>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
) -> Response {
    let principal = principal.map(|Extension(p)| p);
    let (jar, ctx) = page_context(locale, principal.as_ref(), jar);
    let page = views::login(&ctx, params.contains_key("error"), params.contains_key("logout"));
    (jar, page).into_response()
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<LoginRequest>,
) -> Response {
    let credentials = match state
        .credentials
        .authenticate(&payload.username, &payload.password)
        .await
    {
        Ok(credentials) => credentials,
        Err(AuthError::BadCredentials) | Err(AuthError::PrincipalNotFound(_)) => {
            return Redirect::to("/auth?error").into_response();
        }
        Err(e) => return e.into_response(),
    };

    let token = match state.jwt.issue(&credentials) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to issue session token: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                views::error_page(StatusCode::INTERNAL_SERVER_ERROR, "Login is unavailable."),
            )
                .into_response();
        }
    };

    let cookie = persistent_cookie(SESSION_COOKIE, token, state.jwt.ttl_seconds());
    (jar.add(cookie), Redirect::to("/")).into_response()
}

/// Logout endpoint
pub async fn logout(principal: Option<Extension<Principal>>, jar: CookieJar) -> Response {
    if let Some(Extension(principal)) = principal {
        info!(username = %principal.username, "User logged out");
    }
    (clear_session(jar), Redirect::to("/auth?logout")).into_response()
}

pub async fn register_form(Extension(locale): Extension<Locale>, jar: CookieJar) -> Response {
    let (jar, ctx) = page_context(locale, None, jar);
    let page = views::register(&ctx, &NewUser::default(), &ValidationErrors::new());
    (jar, page).into_response()
}

pub async fn register(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    jar: CookieJar,
    Form(candidate): Form<NewUser>,
) -> Result<Response, ServiceError> {
    let outcome = match validation::validate_new_user(&candidate) {
        Ok(()) => state.users.register_user(candidate.clone()).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };

    match outcome {
        Ok(_) => Ok(redirect_with(jar, "/auth", "flash.registered")),
        Err(e) => {
            let errors = form_errors(e)?;
            let (jar, ctx) = page_context(locale, None, jar);
            Ok((jar, views::register(&ctx, &candidate, &errors)).into_response())
        }
    }
}
