use crate::error::WikiError;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use std::time::Duration;

mod store;

pub use store::{MAX_SESSION_TTL, Session, SessionStore, spawn_session_reaper};

#[cfg(test)]
pub use store::SessionData;

pub const SESSION_COOKIE: &str = "camelwiki_sid";

/// Attaches a [`Session`] to every request, issuing a cookie when a new one is started.
pub async fn session_middleware(
    State(sessions): State<Arc<SessionStore>>,
    mut req: Request,
    next: Next,
) -> Response {
    let presented = parse_cookie(req.headers(), SESSION_COOKIE);
    let (session, created) = sessions.load_or_create(presented.as_deref()).await;

    req.extensions_mut().insert(session.clone());
    let mut response = next.run(req).await;

    if created {
        match session_cookie(session.id(), sessions.ttl()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "unable to build session cookie"),
        }
    }

    response
}

pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn session_cookie(id: &str, ttl: Duration) -> Result<HeaderValue, http::header::InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        id,
        ttl.as_secs()
    ))
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = WikiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(WikiError::MissingSession)
    }
}
