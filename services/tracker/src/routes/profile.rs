//! Self-service profile pages

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::{form_errors, page_context, redirect_with};
use crate::error::ServiceError;
use crate::messages::Locale;
use crate::middleware::Principal;
use crate::models::{ProfileUpdate, User};
use crate::state::AppState;
use crate::validation::{self, ValidationErrors};
use crate::views;

async fn current_user(state: &AppState, principal: &Principal) -> Result<User, ServiceError> {
    state
        .users
        .find_by_username(&principal.username)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "User not found with username: {}",
                principal.username
            ))
        })
}

pub async fn show(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    let user = current_user(&state, &principal).await?;
    let bugs = state.users.assigned_bugs(user.id).await?;

    let (jar, ctx) = page_context(locale, Some(&principal), jar);
    Ok((jar, views::profile(&ctx, &user, &bugs)).into_response())
}

pub async fn edit_form(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    let user = current_user(&state, &principal).await?;
    let values = ProfileUpdate {
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        password: None,
    };

    let (jar, ctx) = page_context(locale, Some(&principal), jar);
    Ok((jar, views::profile_form(&ctx, &values, &ValidationErrors::new())).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    jar: CookieJar,
    Form(profile): Form<ProfileUpdate>,
) -> Result<Response, ServiceError> {
    let outcome = match validation::validate_profile(&profile) {
        Ok(()) => {
            state
                .users
                .update_profile(&principal.username, profile.clone())
                .await
        }
        Err(errors) => Err(ServiceError::Validation(errors)),
    };

    match outcome {
        Ok(_) => Ok(redirect_with(jar, "/profile", "flash.profile.updated")),
        Err(e) => {
            let errors = form_errors(e)?;
            let (jar, ctx) = page_context(locale, Some(&principal), jar);
            Ok((jar, views::profile_form(&ctx, &profile, &errors)).into_response())
        }
    }
}
