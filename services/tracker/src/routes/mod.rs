//! HTTP routes for the bug tracker

mod auth;
mod bugs;
mod pages;
mod profile;
mod users;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};
use axum_extra::extract::cookie::CookieJar;
use common::pagination::PageRequest;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::ServiceError;
use crate::flash::{self, Flash};
use crate::messages::Locale;
use crate::middleware::{Principal, locale_middleware, require_admin, require_auth, session_middleware};
use crate::state::AppState;
use crate::validation::ValidationErrors;
use crate::views::PageContext;

/// Create the router for the bug tracker
pub fn create_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/new", get(users::new_form))
        .route("/users/:id", delete(users::delete))
        .route("/users/:id/edit", get(users::edit_form).post(users::update))
        .route("/users/:id/delete", post(users::delete))
        .route("/bugs/:id/delete", post(bugs::delete))
        .route_layer(from_fn(require_admin));

    let protected = Router::new()
        .route("/bugs", get(bugs::list).post(bugs::create))
        .route("/bugs/new", get(bugs::new_form))
        .route("/bugs/search", get(bugs::search))
        .route("/bugs/:id", get(bugs::detail))
        .route("/bugs/:id/edit", get(bugs::edit_form).post(bugs::update))
        .route("/bugs/:id/assign", post(bugs::assign))
        .route("/bugs/:id/unassign", post(bugs::unassign))
        .route("/profile", get(profile::show))
        .route("/profile/edit", get(profile::edit_form).post(profile::update))
        .merge(admin)
        .route_layer(from_fn(require_auth));

    Router::new()
        .route("/", get(pages::home))
        .route("/home", get(pages::home))
        .route("/about", get(pages::about))
        .route("/health", get(pages::health_check))
        .route("/auth", get(auth::login_page))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/register", get(auth::register_form).post(auth::register))
        .merge(protected)
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(from_fn(locale_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `page` and `size` query parameters, plus `sort` where a listing supports it
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    page: Option<u32>,
    size: Option<u32>,
    sort: Option<String>,
}

impl PageParams {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(PageRequest::DEFAULT_SIZE),
        )
    }
}

/// Consume any pending flash message into the context of the page being rendered
fn page_context(
    locale: Locale,
    principal: Option<&Principal>,
    jar: CookieJar,
) -> (CookieJar, PageContext<'_>) {
    let (jar, flash) = flash::take(jar);
    (
        jar,
        PageContext {
            locale,
            principal,
            flash,
        },
    )
}

/// Redirect to `to` with a success message
fn redirect_with(jar: CookieJar, to: &str, key: &str) -> Response {
    (flash::set(jar, Flash::success(key)), Redirect::to(to)).into_response()
}

/// Turn a `NotFound` into a redirect carrying its message; pass anything else on
fn not_found_to(jar: CookieJar, to: &str, e: ServiceError) -> Result<Response, ServiceError> {
    match e {
        ServiceError::NotFound(message) => {
            warn!("{}", message);
            Ok((flash::set(jar, Flash::error_text(message)), Redirect::to(to)).into_response())
        }
        other => Err(other),
    }
}

/// Field errors for a failure a form can display; anything else is passed on
fn form_errors(e: ServiceError) -> Result<ValidationErrors, ServiceError> {
    match e {
        ServiceError::Validation(errors) => Ok(errors),
        ServiceError::AlreadyExists { field, .. } => {
            let key = if field == "username" {
                "validation.username.taken"
            } else {
                "validation.email.taken"
            };
            Ok(ValidationErrors::single(field, key))
        }
        other => Err(other),
    }
}
