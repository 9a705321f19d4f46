use crate::config::{AuthBackend, WikiConfig};
use crate::database::sqlite::{SqliteRepository, connect};
use crate::database::{PageRepository, RequestLogRepository, UserRepository};
use crate::domain::User;
use crate::features::auth::credentials::{CredentialStore, RepositoryCredentials, StaticCredentials};
use crate::session::{SessionStore, spawn_session_reaper};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

pub mod config;
mod database;
mod domain;
mod error;
mod features;
mod parser;
mod render;
mod session;

#[cfg(test)]
mod tests;

// everything a handler can reach; built once at startup and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<dyn PageRepository>,
    pub credentials: Arc<dyn CredentialStore>,
    pub request_log: Option<Arc<dyn RequestLogRepository>>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<WikiConfig>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // load centralized config
    let config = WikiConfig::from_env().context("Invalid configuration")?;
    let shared_config = Arc::new(config.clone());

    // connect to our db, creating and migrating it as needed
    let pool = connect(&config.database_url, config.max_connections).await?;
    tracing::info!(database_url = %config.database_url, "database ready");

    let repo = Arc::new(SqliteRepository::new(pool));
    let app_state = build_app_state(repo, shared_config).await?;

    // drop expired sessions in the background
    spawn_session_reaper(app_state.sessions.clone(), config.session_reap_interval);

    let app = features::wiki_router(app_state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "wiki listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("wiki stopped");
    Ok(())
}

async fn build_app_state(repo: Arc<SqliteRepository>, config: Arc<WikiConfig>) -> Result<AppState> {
    let credentials: Arc<dyn CredentialStore> = match config.auth_backend {
        AuthBackend::Static => {
            let store = StaticCredentials::new(&config.users);
            if store.is_empty() {
                tracing::warn!("WIKI_USERS is empty, nobody will be able to log in");
            }
            Arc::new(store)
        }
        AuthBackend::Database => {
            for credential in &config.users {
                let user = User {
                    username: credential.username.clone(),
                    password: credential.password.clone(),
                };
                repo.seed_user(&user).await?;
            }
            tracing::info!(seeded = config.users.len(), "using database credentials");
            Arc::new(RepositoryCredentials::new(repo.clone()))
        }
    };

    let request_log: Option<Arc<dyn RequestLogRepository>> = if config.request_log_enabled {
        tracing::info!("request logging enabled");
        Some(repo.clone() as Arc<dyn RequestLogRepository>)
    } else {
        None
    };

    Ok(AppState {
        pages: repo,
        credentials,
        request_log,
        sessions: Arc::new(SessionStore::new(config.session_ttl)),
        config,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
