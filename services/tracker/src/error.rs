//! Error types for the tracker service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use thiserror::Error;
use tracing::error;

use crate::password::PasswordError;
use crate::validation::ValidationErrors;
use crate::views;

/// Errors raised by the user and bug services
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The addressed record does not exist
    #[error("{0}")]
    NotFound(String),

    /// A unique field (`username` or `email`) is already taken
    #[error("{message}")]
    AlreadyExists {
        field: &'static str,
        message: String,
    },

    /// Submitted values break structural constraints
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A search or sort parameter cannot be applied
    #[error("Invalid criteria for {field}: {message_key}")]
    InvalidCriteria {
        field: String,
        message_key: &'static str,
    },

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    pub fn user_not_found(id: i64) -> Self {
        ServiceError::NotFound(format!("User not found with ID: {id}"))
    }

    pub fn username_taken(username: &str) -> Self {
        ServiceError::AlreadyExists {
            field: "username",
            message: format!("Username '{username}' already exists."),
        }
    }

    pub fn email_taken(email: &str) -> Self {
        ServiceError::AlreadyExists {
            field: "email",
            message: format!("Email '{email}' already exists."),
        }
    }

    /// Whether this is an unexpected infrastructure failure
    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Password(_) | ServiceError::Database(_))
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Database(DatabaseError::Query(e))
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

/// Errors raised while resolving a principal
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User not found: {0}")]
    PrincipalNotFound(String),

    #[error("Bad credentials")]
    BadCredentials,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<DatabaseError> for AuthError {
    fn from(e: DatabaseError) -> Self {
        AuthError::Service(ServiceError::Database(e))
    }
}

/// Fallback rendering for errors a handler did not turn into a form message
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::AlreadyExists { .. } => StatusCode::CONFLICT,
            ServiceError::Validation(_) | ServiceError::InvalidCriteria { .. } => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Password(_) | ServiceError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let detail = if self.is_internal() {
            error!("Request failed: {}", self);
            "An unexpected error occurred. Please try again later.".to_string()
        } else {
            self.to_string()
        };

        (status, views::error_page(status, &detail)).into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Service(e) => e.into_response(),
            other => (
                StatusCode::UNAUTHORIZED,
                views::error_page(StatusCode::UNAUTHORIZED, &other.to_string()),
            )
                .into_response(),
        }
    }
}
