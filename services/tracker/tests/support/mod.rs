//! Shared fixtures for the tracker integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use argon2::Params;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, Response, header},
};
use common::database::DatabaseConfig;
use tower::ServiceExt;

use tracker::{
    AppState,
    database::Database,
    jwt::JwtService,
    models::{NewBug, NewUser, Priority, Status},
    password::{Argon2PasswordEncoder, PasswordEncoder},
    routes,
};

pub const PASSWORD: &str = "password";

/// Argon2 with the smallest allowed cost, so tests stay fast
pub fn encoder() -> Arc<dyn PasswordEncoder> {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("argon2 params");
    Arc::new(Argon2PasswordEncoder::with_params(params))
}

pub async fn state() -> AppState {
    let db = Database::open_in_memory().await.expect("open database");
    AppState::new(db, encoder(), JwtService::new("integration-test-secret", 3600))
}

/// State over a database file in `dir`, served by a multi-connection pool
pub async fn file_state(dir: &Path) -> AppState {
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}", dir.join("tracker.db").display()),
        max_connections: 5,
    };
    let db = Database::connect(&config).await.expect("open database file");
    AppState::new(db, encoder(), JwtService::new("integration-test-secret", 3600))
}

pub fn new_user(username: &str, admin: bool) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: PASSWORD.to_string(),
        first_name: "Test".to_string(),
        last_name: username.to_string(),
        email: format!("{username}@example.com"),
        admin,
    }
}

pub fn new_bug(title: &str, assignee_ids: Vec<i64>) -> NewBug {
    NewBug {
        title: title.to_string(),
        description: format!("Steps to reproduce: {title}"),
        priority: Priority::Medium,
        status: Status::Open,
        assignee_ids,
    }
}

/// Router over a fresh database holding the admin `jdoe` and the user `asmith`
pub async fn app() -> (Router, AppState) {
    let state = state().await;
    state
        .users
        .create_user(new_user("jdoe", true))
        .await
        .expect("create admin");
    state
        .users
        .create_user(new_user("asmith", false))
        .await
        .expect("create user");
    (routes::create_router(state.clone()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router never fails")
}

pub fn get(uri: &str, cookies: &[&str]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies.join("; "));
    }
    builder.body(Body::empty()).expect("request")
}

pub fn post_form(uri: &str, form: &str, cookies: &[&str]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies.join("; "));
    }
    builder.body(Body::from(form.to_string())).expect("request")
}

/// `name=value` of the cookie named `name` set by a response
pub fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Log in through the form and return the session cookie pair
pub async fn login(app: &Router, username: &str) -> String {
    let form = format!("username={username}&password={PASSWORD}");
    let response = send(app, post_form("/login", &form, &[])).await;
    assert_eq!(location(&response), "/");
    cookie(response.headers(), "SESSION").expect("session cookie")
}
