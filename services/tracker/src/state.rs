//! Application state shared across handlers

use std::sync::Arc;

use crate::credentials::CredentialsProvider;
use crate::database::Database;
use crate::jwt::JwtService;
use crate::password::PasswordEncoder;
use crate::services::{BugService, UserService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub users: UserService,
    pub bugs: BugService,
    pub credentials: CredentialsProvider,
    pub jwt: JwtService,
}

impl AppState {
    /// Wire every component to one database and one password encoder
    pub fn new(db: Database, encoder: Arc<dyn PasswordEncoder>, jwt: JwtService) -> Self {
        Self {
            users: UserService::new(db.clone(), Arc::clone(&encoder)),
            bugs: BugService::new(db.clone()),
            credentials: CredentialsProvider::new(db.clone(), encoder),
            db,
            jwt,
        }
    }
}
