//! Bug pages: listing, search, detail, editing and assignment

use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use common::pagination::PageRequest;
use serde::Deserialize;

use super::{PageParams, form_errors, not_found_to, page_context, redirect_with};
use crate::error::ServiceError;
use crate::messages::Locale;
use crate::middleware::Principal;
use crate::models::{BugCriteria, BugDetails, NewBug, Priority, SearchableBugField, Status};
use crate::state::AppState;
use crate::validation::{self, ValidationErrors};
use crate::views::{self, FormMode, SearchForm};

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub user_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    field: Option<String>,
    value: Option<String>,
    exact: Option<String>,
    page: Option<u32>,
    size: Option<u32>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<PageParams>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    let page = state.bugs.list_bugs(params.page_request()).await?;
    let (jar, ctx) = page_context(locale, Some(&principal), jar);
    Ok((jar, views::bug_list(&ctx, &page)).into_response())
}

pub async fn new_form(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    let users = state.users.all_users().await?;
    let values = NewBug {
        title: String::new(),
        description: String::new(),
        priority: Priority::Medium,
        status: Status::Open,
        assignee_ids: Vec::new(),
    };

    let (jar, ctx) = page_context(locale, Some(&principal), jar);
    let page = views::bug_form(&ctx, FormMode::Create, &values, &users, &ValidationErrors::new());
    Ok((jar, page).into_response())
}

/// `POST /bugs`; the form may repeat `assignee_ids`
pub async fn create(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    jar: CookieJar,
    axum_extra::extract::Form(candidate): axum_extra::extract::Form<NewBug>,
) -> Result<Response, ServiceError> {
    let outcome = match validation::validate_new_bug(&candidate) {
        Ok(()) => state.bugs.create_bug(candidate.clone()).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };

    match outcome {
        Ok(bug) => Ok(redirect_with(jar, &format!("/bugs/{}", bug.id), "flash.bug.created")),
        Err(e @ ServiceError::NotFound(_)) => not_found_to(jar, "/bugs", e),
        Err(e) => {
            let errors = form_errors(e)?;
            let users = state.users.all_users().await?;
            let (jar, ctx) = page_context(locale, Some(&principal), jar);
            let page = views::bug_form(&ctx, FormMode::Create, &candidate, &users, &errors);
            Ok((jar, page).into_response())
        }
    }
}

pub async fn detail(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    let bug = match state.bugs.get_bug_by_id(id).await {
        Ok(bug) => bug,
        Err(e) => return not_found_to(jar, "/bugs", e),
    };
    let assigned = state.bugs.assigned_users(id).await?;
    let all_users = state.users.all_users().await?;

    let (jar, ctx) = page_context(locale, Some(&principal), jar);
    Ok((jar, views::bug_detail(&ctx, &bug, &assigned, &all_users)).into_response())
}

pub async fn edit_form(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    let bug = match state.bugs.get_bug_by_id(id).await {
        Ok(bug) => bug,
        Err(e) => return not_found_to(jar, "/bugs", e),
    };
    let values = NewBug {
        title: bug.title,
        description: bug.description,
        priority: bug.priority,
        status: bug.status,
        assignee_ids: Vec::new(),
    };

    let (jar, ctx) = page_context(locale, Some(&principal), jar);
    let page = views::bug_form(&ctx, FormMode::Edit(id), &values, &[], &ValidationErrors::new());
    Ok((jar, page).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(details): Form<BugDetails>,
) -> Result<Response, ServiceError> {
    let outcome = match validation::validate_bug_details(&details) {
        Ok(()) => state.bugs.update_bug(id, details.clone()).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };

    match outcome {
        Ok(bug) => Ok(redirect_with(jar, &format!("/bugs/{}", bug.id), "flash.bug.updated")),
        Err(e @ ServiceError::NotFound(_)) => not_found_to(jar, "/bugs", e),
        Err(e) => {
            let errors = form_errors(e)?;
            let values = NewBug {
                title: details.title,
                description: details.description,
                priority: details.priority,
                status: details.status,
                assignee_ids: Vec::new(),
            };
            let (jar, ctx) = page_context(locale, Some(&principal), jar);
            let page = views::bug_form(&ctx, FormMode::Edit(id), &values, &[], &errors);
            Ok((jar, page).into_response())
        }
    }
}

pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(request): Form<AssignRequest>,
) -> Result<Response, ServiceError> {
    match state.bugs.assign_user(id, request.user_id).await {
        Ok(_) => Ok(redirect_with(jar, &format!("/bugs/{id}"), "flash.bug.assigned")),
        Err(e) => not_found_to(jar, "/bugs", e),
    }
}

pub async fn unassign(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(request): Form<AssignRequest>,
) -> Result<Response, ServiceError> {
    match state.bugs.unassign_user(id, request.user_id).await {
        Ok(_) => Ok(redirect_with(jar, &format!("/bugs/{id}"), "flash.bug.unassigned")),
        Err(e) => not_found_to(jar, "/bugs", e),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    match state.bugs.delete_bug(id).await {
        Ok(()) => Ok(redirect_with(jar, "/bugs", "flash.bug.deleted")),
        Err(e) => not_found_to(jar, "/bugs", e),
    }
}

/// `GET /bugs/search?field=..&value=..&exact=true`
pub async fn search(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<SearchParams>,
    jar: CookieJar,
) -> Result<Response, ServiceError> {
    let exact = matches!(params.exact.as_deref(), Some("true" | "on"));
    let value = params.value.clone().unwrap_or_default();
    let request = PageRequest::new(
        params.page.unwrap_or(0),
        params.size.unwrap_or(PageRequest::DEFAULT_SIZE),
    );

    let mut form = SearchForm {
        field: None,
        value,
        exact,
    };
    let mut results = None;
    let mut message_key = None;

    if let Some(raw_field) = params.field.as_deref().filter(|f| !f.trim().is_empty()) {
        match raw_field.parse::<SearchableBugField>() {
            Ok(field) => {
                form.field = Some(field);
                let mut criteria = BugCriteria::new(field, form.value.clone());
                criteria.exact_match = exact;
                match state.bugs.search_bugs(&criteria, request).await {
                    Ok(page) => results = Some(page),
                    Err(ServiceError::InvalidCriteria { message_key: key, .. }) => {
                        message_key = Some(key)
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(_) => message_key = Some("search.field.invalid"),
        }
    }

    let (jar, ctx) = page_context(locale, Some(&principal), jar);
    let page = views::search(&ctx, &form, results.as_ref(), message_key);
    Ok((jar, page).into_response())
}
