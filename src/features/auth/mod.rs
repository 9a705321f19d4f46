pub mod credentials;
pub mod model;

use crate::AppState;
use crate::error::WikiError;
use crate::render::login_view;
use crate::session::Session;
use axum::{
    Form,
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use credentials::authenticate;
use model::LoginForm;

pub const LOGIN_PATH: &str = "/login";

// where a login lands when the gate never stashed a target
const DEFAULT_AFTER_LOGIN: &str = "/";

pub async fn login_form_handler() -> Html<String> {
    login_view()
}

pub async fn login_submit_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, WikiError> {
    let accepted =
        authenticate(state.credentials.as_ref(), &form.username, &form.password).await?;

    if !accepted {
        tracing::info!(username = %form.username, "login rejected");
        return Ok(Redirect::to(LOGIN_PATH));
    }

    session.set_user(Some(form.username.clone())).await;
    tracing::info!(username = %form.username, "login accepted");

    let target = session
        .take_request_url()
        .await
        .unwrap_or_else(|| DEFAULT_AFTER_LOGIN.to_string());

    Ok(Redirect::to(&target))
}

pub async fn logout_handler(session: Session) -> Redirect {
    if let Some(user) = session.user().await {
        tracing::info!(username = %user, "logout");
    }
    session.set_user(None).await;
    Redirect::to(DEFAULT_AFTER_LOGIN)
}

/// Route layer for handlers that change pages.
///
/// Without a logged-in user the wrapped handler never runs: the browser is sent
/// to the login page, and for `GET`/`HEAD` the requested path is remembered so
/// a successful login can resume it.
pub async fn require_login(session: Session, req: Request, next: Next) -> Response {
    if session.user().await.is_some() {
        return next.run(req).await;
    }

    if *req.method() == Method::GET || *req.method() == Method::HEAD {
        let requested = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.uri().path().to_string());
        session.set_request_url(requested).await;
    }

    tracing::debug!(path = %req.uri().path(), "login required");
    Redirect::to(LOGIN_PATH).into_response()
}
