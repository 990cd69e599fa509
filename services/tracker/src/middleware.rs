//! Request middleware: locale selection, session resolution and route guards

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::messages::{LOCALE_COOKIE, Locale};
use crate::models::Role;
use crate::state::AppState;
use crate::views;

/// Name of the cookie holding the session token
pub const SESSION_COOKIE: &str = "SESSION";

/// How long an explicitly chosen locale is remembered
const LOCALE_MAX_AGE_SECONDS: u64 = 30 * 24 * 60 * 60;

/// The authenticated user making the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Build a cookie that outlives the browser session
pub(crate) fn persistent_cookie(name: &'static str, value: String, max_age_seconds: u64) -> Cookie<'static> {
    let max_age = Duration::seconds(i64::try_from(max_age_seconds).unwrap_or(i64::MAX));
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

#[derive(Debug, Deserialize)]
pub struct LangParam {
    lang: Option<String>,
}

/// Resolve the request locale from `?lang=` or the locale cookie
///
/// An explicit `?lang=` is remembered in the locale cookie.
pub async fn locale_middleware(
    Query(param): Query<LangParam>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let requested = param.lang.as_deref().and_then(Locale::from_tag);
    let locale = requested
        .or_else(|| {
            jar.get(LOCALE_COOKIE)
                .and_then(|cookie| Locale::from_tag(cookie.value()))
        })
        .unwrap_or_default();

    req.extensions_mut().insert(locale);
    let response = next.run(req).await;

    match requested {
        Some(locale) => {
            let cookie = persistent_cookie(LOCALE_COOKIE, locale.tag().to_string(), LOCALE_MAX_AGE_SECONDS);
            (jar.add(cookie), response).into_response()
        }
        None => response,
    }
}

/// Attach the principal named by a valid session cookie
///
/// Credentials are re-read on every request, so a deleted user loses access
/// at once and a role change applies on the next request. Stale sessions
/// are cleared.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return next.run(req).await;
    };

    let claims = match state.jwt.validate(&token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Discarding invalid session: {}", e);
            let response = next.run(req).await;
            return (clear_session(jar), response).into_response();
        }
    };

    match state.credentials.load_credentials(&claims.sub).await {
        Ok(credentials) => {
            req.extensions_mut().insert(Principal {
                username: credentials.username,
                role: credentials.role,
            });
            next.run(req).await
        }
        Err(AuthError::PrincipalNotFound(username)) => {
            warn!(username = %username, "Session names a user that no longer exists");
            let response = next.run(req).await;
            (clear_session(jar), response).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub(crate) fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Send anonymous requests to the login page
pub async fn require_auth(req: Request, next: Next) -> Response {
    if req.extensions().get::<Principal>().is_none() {
        return Redirect::to("/auth").into_response();
    }
    next.run(req).await
}

/// Reject principals without the admin role
pub async fn require_admin(req: Request, next: Next) -> Response {
    let is_admin = req
        .extensions()
        .get::<Principal>()
        .is_some_and(Principal::is_admin);

    if !is_admin {
        let locale = req.extensions().get::<Locale>().copied().unwrap_or_default();
        warn!(path = %req.uri().path(), "Forbidden: admin role required");
        return (
            StatusCode::FORBIDDEN,
            views::error_page(StatusCode::FORBIDDEN, locale.text("error.forbidden")),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistent_cookie_attributes() {
        let cookie = persistent_cookie(LOCALE_COOKIE, "fr".to_string(), LOCALE_MAX_AGE_SECONDS);
        assert_eq!(cookie.name(), "user_locale");
        assert_eq!(cookie.value(), "fr");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(
            cookie.max_age().map(|age| age.whole_seconds()),
            Some(2_592_000)
        );
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_persistent_cookie_keeps_value_and_clamps_age() {
        let cookie = persistent_cookie("SESSION", "tok;en".to_string(), 60);
        assert_eq!(cookie.value(), "tok;en");
        assert_eq!(cookie.max_age().map(|age| age.whole_seconds()), Some(60));

        let cookie = persistent_cookie("SESSION", "token".to_string(), u64::MAX);
        assert_eq!(cookie.max_age().map(|age| age.whole_seconds()), Some(i64::MAX));
    }
}
