pub mod model;

use crate::AppState;
use crate::domain::Page;
use crate::error::WikiError;
use crate::parser::markdown::render_page_content;
use crate::render::{all_pages_view, edit_view, page_href, page_view, placeholder_view};
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use model::SaveForm;

// browsers probe for this on every page, it is never a wiki page
pub const FAVICON: &str = "favicon.ico";

pub async fn home_handler(State(state): State<AppState>) -> Redirect {
    Redirect::to(&page_href(&state.config.home_page))
}

pub async fn all_pages_handler(State(state): State<AppState>) -> Result<Html<String>, WikiError> {
    let pages = state.pages.get_all_pages().await?;
    Ok(all_pages_view(&pages))
}

pub async fn read_page_handler(
    State(state): State<AppState>,
    Path(page_name): Path<String>,
) -> Result<Response, WikiError> {
    if page_name == FAVICON {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    match state.pages.get_page(&page_name).await? {
        None => Ok(placeholder_view(&page_name).into_response()),
        Some(page) => {
            let html_content = render_page_content(&page.content);
            Ok(page_view(&page_name, &html_content).into_response())
        }
    }
}

// always edits the stored markdown source, never the rendered html
pub async fn edit_page_handler(
    State(state): State<AppState>,
    Path(page_name): Path<String>,
) -> Result<Html<String>, WikiError> {
    let current_content = state
        .pages
        .get_page(&page_name)
        .await?
        .map(|page| page.content)
        .unwrap_or_default();

    Ok(edit_view(&page_name, &current_content))
}

pub async fn save_page_handler(
    State(state): State<AppState>,
    Path(page_name): Path<String>,
    Form(form): Form<SaveForm>,
) -> Result<Redirect, WikiError> {
    let page = Page::new(page_name, form.page_content);
    state.pages.upsert_page(&page).await?;

    tracing::info!(page = %page.id, bytes = page.content.len(), "page saved");

    Ok(Redirect::to(&page_href(&page.id)))
}
