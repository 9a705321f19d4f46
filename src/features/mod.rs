pub mod auth;
pub mod pages;
pub mod request_log;

use crate::AppState;
use crate::session::session_middleware;
use axum::{
    Router,
    middleware,
    routing::{MethodFilter, MethodRouter, on},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const STATIC_PREFIX: &str = "/static";

// turns a route's method filter into the router entry for its handler
type RouteBuilder = Box<dyn FnOnce(MethodFilter) -> MethodRouter<AppState>>;

// one row of the route table
pub struct WikiRoute {
    pub method: MethodFilter,
    pub path: &'static str,
    // edits and saves sit behind the login gate
    pub gated: bool,
    build: RouteBuilder,
}

impl WikiRoute {
    fn new<H, T>(method: MethodFilter, path: &'static str, gated: bool, handler: H) -> Self
    where
        H: axum::handler::Handler<T, AppState>,
        T: 'static,
    {
        Self {
            method,
            path,
            gated,
            build: Box::new(move |filter| on(filter, handler)),
        }
    }

    fn get<H, T>(path: &'static str, gated: bool, handler: H) -> Self
    where
        H: axum::handler::Handler<T, AppState>,
        T: 'static,
    {
        Self::new(MethodFilter::GET, path, gated, handler)
    }

    fn post<H, T>(path: &'static str, gated: bool, handler: H) -> Self
    where
        H: axum::handler::Handler<T, AppState>,
        T: 'static,
    {
        Self::new(MethodFilter::POST, path, gated, handler)
    }

    fn into_method_router(self) -> MethodRouter<AppState> {
        (self.build)(self.method)
    }
}

/// Every route the wiki answers, in registration order.
///
/// Literal paths come before `/{page_name}`. The matcher always prefers a
/// literal segment over a parameter, so `/AllPages` and `/login` can never be
/// read as page names.
pub fn route_table() -> Vec<WikiRoute> {
    vec![
        WikiRoute::get("/", false, pages::home_handler),
        WikiRoute::get("/AllPages", false, pages::all_pages_handler),
        WikiRoute::get(auth::LOGIN_PATH, false, auth::login_form_handler),
        WikiRoute::post("/login-submit", false, auth::login_submit_handler),
        WikiRoute::get("/logout", false, auth::logout_handler),
        WikiRoute::get("/{page_name}", false, pages::read_page_handler),
        WikiRoute::get("/{page_name}/edit", true, pages::edit_page_handler),
        WikiRoute::post("/{page_name}/save", true, pages::save_page_handler),
    ]
}

// composes the route table with the gate, session, request log and static layers
pub fn wiki_router(state: AppState) -> Router {
    let mut open = Router::new();
    let mut gated = Router::new();

    for route in route_table() {
        let path = route.path;
        if route.gated {
            gated = gated.route(path, route.into_method_router());
        } else {
            open = open.route(path, route.into_method_router());
        }
    }

    let mut app = open.merge(gated.route_layer(middleware::from_fn(auth::require_login)));

    if let Some(log_repo) = state.request_log.clone() {
        app = app.layer(middleware::from_fn_with_state(
            log_repo,
            request_log::request_logger,
        ));
    }

    app.layer(middleware::from_fn_with_state(
        state.sessions.clone(),
        session_middleware,
    ))
    .nest_service(STATIC_PREFIX, ServeDir::new(&state.config.static_dir))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
