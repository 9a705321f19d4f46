use crate::session::{MAX_SESSION_TTL, SessionData, SessionStore, parse_cookie};
use axum::http::{HeaderMap, HeaderValue, header};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_new_session_starts_empty() {
    let store = Arc::new(SessionStore::new(Duration::from_secs(60)));

    let (session, created) = store.load_or_create(None).await;

    assert!(created);
    assert_eq!(session.data().await, SessionData::default());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_presented_live_session_is_reused() {
    let store = Arc::new(SessionStore::new(Duration::from_secs(60)));
    let (first, _) = store.load_or_create(None).await;
    first.set_user(Some("editor".into())).await;

    let (again, created) = store.load_or_create(Some(first.id())).await;

    assert!(!created);
    assert_eq!(again.id(), first.id());
    assert_eq!(again.user().await.as_deref(), Some("editor"));
}

// an unknown id never resurrects anything, a fresh session is issued instead
#[tokio::test]
async fn test_unknown_id_gets_fresh_session() {
    let store = Arc::new(SessionStore::new(Duration::from_secs(60)));

    let (session, created) = store.load_or_create(Some("forged")).await;

    assert!(created);
    assert_ne!(session.id(), "forged");
}

#[tokio::test]
async fn test_expired_session_is_treated_as_absent() {
    let store = Arc::new(SessionStore::new(Duration::from_millis(20)));
    let (session, _) = store.load_or_create(None).await;
    session.set_user(Some("editor".into())).await;

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(store.get(session.id()).await.is_none());
    assert!(session.user().await.is_none());

    let (fresh, created) = store.load_or_create(Some(session.id())).await;
    assert!(created);
    assert_ne!(fresh.id(), session.id());
}

#[tokio::test]
async fn test_purge_expired_drops_only_dead_sessions() {
    let store = Arc::new(SessionStore::new(Duration::from_millis(20)));
    store.load_or_create(None).await;
    store.load_or_create(None).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.purge_expired().await, 2);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_request_url_is_stashed() {
    let store = Arc::new(SessionStore::new(Duration::from_secs(60)));
    let (session, _) = store.load_or_create(None).await;

    session.set_request_url("/SomePage/edit".into()).await;

    assert_eq!(session.data().await.request_url.as_deref(), Some("/SomePage/edit"));
    assert!(session.user().await.is_none());

    // taking it clears it
    assert_eq!(session.take_request_url().await.as_deref(), Some("/SomePage/edit"));
    assert!(session.take_request_url().await.is_none());
}

// a huge lifetime is capped instead of overflowing the deadline
#[tokio::test]
async fn test_oversized_ttl_is_capped() {
    let store = Arc::new(SessionStore::new(Duration::MAX));
    assert_eq!(store.ttl(), MAX_SESSION_TTL);

    let (session, created) = store.load_or_create(None).await;
    session.set_user(Some("editor".into())).await;

    assert!(created);
    assert_eq!(session.user().await.as_deref(), Some("editor"));
}

#[test]
fn test_parse_cookie_finds_named_value() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("theme=dark; camelwiki_sid=abc123; other=1"),
    );

    assert_eq!(parse_cookie(&headers, "camelwiki_sid").as_deref(), Some("abc123"));
    assert_eq!(parse_cookie(&headers, "missing"), None);
}
