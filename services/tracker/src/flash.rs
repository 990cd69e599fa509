//! One-shot messages carried across a redirect
//!
//! The message lives in a `flash` cookie holding base64url-encoded JSON and
//! is removed by the first page that renders it.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use tracing::debug;

const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    /// Message key
    pub key: String,
    /// Substituted for `{0}` in the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
}

impl Flash {
    pub fn success(key: &str) -> Self {
        Self {
            kind: FlashKind::Success,
            key: key.to_string(),
            arg: None,
        }
    }

    /// An error whose text is shown verbatim
    pub fn error_text(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            key: "flash.error".to_string(),
            arg: Some(text.into()),
        }
    }

    fn encode(&self) -> Option<String> {
        let json = serde_json::to_vec(self).ok()?;
        Some(URL_SAFE_NO_PAD.encode(json))
    }

    fn decode(raw: &str) -> Option<Self> {
        let json = URL_SAFE_NO_PAD.decode(raw).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

/// Queue `flash` for the next rendered page
pub fn set(jar: CookieJar, flash: Flash) -> CookieJar {
    match flash.encode() {
        Some(value) => jar.add(
            Cookie::build((FLASH_COOKIE, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        ),
        None => jar,
    }
}

/// Remove and return the pending message, if any
///
/// A cookie that does not decode is dropped silently.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let flash = Flash::decode(cookie.value());
    if flash.is_none() {
        debug!("Discarding undecodable flash cookie");
    }
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_take() {
        let flash = Flash::error_text("Bug not found with id: 9 (é)");
        let jar = set(CookieJar::new(), flash.clone());

        let raw = jar.get(FLASH_COOKIE).expect("flash cookie").value().to_string();
        assert!(raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

        let (_, taken) = take(jar);
        assert_eq!(taken, Some(flash));
    }

    #[test]
    fn test_take_without_cookie() {
        let (_, taken) = take(CookieJar::new());
        assert!(taken.is_none());
    }

    #[test]
    fn test_garbage_cookie_is_ignored() {
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "!!not-base64!!"));
        let (_, taken) = take(jar);
        assert!(taken.is_none());
    }
}
