//! Multi-user bug tracker
//!
//! Users sign in, administrators manage accounts, and everyone reports,
//! assigns and resolves bugs through server-rendered pages.

pub mod config;
pub mod credentials;
pub mod database;
pub mod error;
pub mod flash;
pub mod jwt;
pub mod messages;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod validation;
pub mod views;

pub use state::AppState;
