//! User administration pages

use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;

use super::{PageParams, form_errors, not_found_to, page_context, redirect_with};
use crate::error::ServiceError;
use crate::messages::Locale;
use crate::middleware::Principal;
use crate::models::{NewUser, UpdateUser};
use crate::state::AppState;
use crate::validation::{self, ValidationErrors};
use crate::views::{self, FormMode};

/// Submitted administrative edit; a blank password keeps the current one
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdateRequest {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
}

impl UserUpdateRequest {
    fn into_update(self, id: i64) -> UpdateUser {
        UpdateUser {
            id,
            username: self.username,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            admin: self.admin,
        }
    }
}

fn form_values(update: &UpdateUser) -> NewUser {
    NewUser {
        username: update.username.clone(),
        password: String::new(),
        first_name: update.first_name.clone(),
        last_name: update.last_name.clone(),
        email: update.email.clone(),
        admin: update.admin,
    }
}

/// `GET /users?page=..&size=..&sort=property,dir`
pub async fn list(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<PageParams>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    let request = params.page_request();
    let sort = params.sort.clone().unwrap_or_default();

    let (page, sort, message_key) = match state.users.list_users(request, Some(&sort)).await {
        Ok(page) => (page, sort, None),
        Err(ServiceError::InvalidCriteria { message_key, .. }) => {
            let page = state.users.list_users(request, None).await?;
            (page, String::new(), Some(message_key))
        }
        Err(e) => return Err(e),
    };

    let (jar, ctx) = page_context(locale, Some(&principal), jar);
    Ok((jar, views::user_list(&ctx, &page, &sort, message_key)).into_response())
}

pub async fn new_form(
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    jar: CookieJar,
) -> Response {
    let (jar, ctx) = page_context(locale, Some(&principal), jar);
    let page = views::user_form(&ctx, FormMode::Create, &NewUser::default(), &ValidationErrors::new());
    (jar, page).into_response()
}

pub async fn create(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    jar: CookieJar,
    Form(candidate): Form<NewUser>,
) -> Result<Response, ServiceError> {
    let outcome = match validation::validate_new_user(&candidate) {
        Ok(()) => state.users.create_user(candidate.clone()).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };

    match outcome {
        Ok(user) => {
            info!(by = %principal.username, user_id = user.id, "Administrator created user");
            Ok(redirect_with(jar, "/users", "flash.user.created"))
        }
        Err(e) => {
            let errors = form_errors(e)?;
            let (jar, ctx) = page_context(locale, Some(&principal), jar);
            Ok((jar, views::user_form(&ctx, FormMode::Create, &candidate, &errors)).into_response())
        }
    }
}

pub async fn edit_form(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    let user = match state.users.get_user(id).await {
        Ok(user) => user,
        Err(e) => return not_found_to(jar, "/users", e),
    };
    let values = NewUser {
        username: user.username,
        password: String::new(),
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        admin: user.admin,
    };

    let (jar, ctx) = page_context(locale, Some(&principal), jar);
    let page = views::user_form(&ctx, FormMode::Edit(id), &values, &ValidationErrors::new());
    Ok((jar, page).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(request): Form<UserUpdateRequest>,
) -> Result<Response, ServiceError> {
    let update = request.into_update(id);
    let outcome = match validation::validate_user_update(&update) {
        Ok(()) => state.users.update_user(update.clone()).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };

    match outcome {
        Ok(_) => Ok(redirect_with(jar, "/users", "flash.user.updated")),
        Err(e @ ServiceError::NotFound(_)) => not_found_to(jar, "/users", e),
        Err(e) => {
            let errors = form_errors(e)?;
            let (jar, ctx) = page_context(locale, Some(&principal), jar);
            let page = views::user_form(&ctx, FormMode::Edit(id), &form_values(&update), &errors);
            Ok((jar, page).into_response())
        }
    }
}

/// `DELETE /users/{id}` and its form-friendly `POST /users/{id}/delete`
pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    match state.users.delete_user(id).await {
        Ok(()) => {
            info!(by = %principal.username, user_id = id, "Administrator deleted user");
            Ok(redirect_with(jar, "/users", "flash.user.deleted"))
        }
        Err(e) => not_found_to(jar, "/users", e),
    }
}
