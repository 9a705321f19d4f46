use crate::session::MAX_SESSION_TTL;
use anyhow::{Context, Result, anyhow, bail};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthBackend {
    // credentials come from WIKI_USERS
    Static,
    // credentials come from the users table
    Database,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct WikiConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub home_page: String,
    pub session_ttl: Duration,
    pub session_reap_interval: Duration,
    pub auth_backend: AuthBackend,
    pub users: Vec<Credential>,
    pub request_log_enabled: bool,
}

impl WikiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // everything reads through `lookup` so tests don't have to touch the process env
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://camelwiki.db".to_string());

        let max_connections = parse_or(&lookup, "MAX_CONNECTIONS", 15u32)?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .context("Failed to parse BIND_ADDR as a socket address")?;

        let static_dir =
            PathBuf::from(lookup("STATIC_DIR").unwrap_or_else(|| "./public".to_string()));

        let home_page = lookup("HOME_PAGE").unwrap_or_else(|| "HomePage".to_string());

        let session_ttl = Duration::from_secs(parse_or(&lookup, "SESSION_TTL_SECS", 1000u64)?);
        if session_ttl.is_zero() || session_ttl > MAX_SESSION_TTL {
            bail!(
                "SESSION_TTL_SECS must be between 1 and {}",
                MAX_SESSION_TTL.as_secs()
            );
        }
        let session_reap_interval =
            Duration::from_secs(parse_or(&lookup, "SESSION_REAP_INTERVAL_SECS", 60u64)?);
        if session_reap_interval.is_zero() {
            bail!("SESSION_REAP_INTERVAL_SECS must be greater than zero");
        }

        let auth_backend = match lookup("AUTH_BACKEND").as_deref() {
            None | Some("static") => AuthBackend::Static,
            Some("database") => AuthBackend::Database,
            Some(other) => bail!("Unknown AUTH_BACKEND '{}', expected 'static' or 'database'", other),
        };

        let users = parse_credentials(&lookup("WIKI_USERS").unwrap_or_default())?;

        let request_log_enabled = lookup("REQUEST_LOG_ENABLED")
            .map(|val| val == "true")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
            static_dir,
            home_page,
            session_ttl,
            session_reap_interval,
            auth_backend,
            users,
            request_log_enabled,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Failed to parse {} from '{}': {}", key, val, e)),
        None => Ok(default),
    }
}

/// Parses `user:password` pairs separated by commas. Blank entries are skipped,
/// the password may itself contain `:`.
pub fn parse_credentials(raw: &str) -> Result<Vec<Credential>> {
    let mut credentials = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (username, password) = entry
            .split_once(':')
            .ok_or_else(|| anyhow!("Malformed WIKI_USERS entry '{}', expected user:password", entry))?;

        if username.is_empty() {
            bail!("Malformed WIKI_USERS entry '{}', username is empty", entry);
        }

        credentials.push(Credential {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    Ok(credentials)
}
