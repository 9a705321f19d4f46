use crate::config::{AuthBackend, Credential, WikiConfig, parse_credentials};
use std::collections::HashMap;
use std::time::Duration;

fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<WikiConfig> {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    WikiConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = config_from(&[]).unwrap();

    assert_eq!(config.database_url, "sqlite://camelwiki.db");
    assert_eq!(config.bind_addr.port(), 3000);
    assert_eq!(config.home_page, "HomePage");
    assert_eq!(config.session_ttl, Duration::from_secs(1000));
    assert_eq!(config.auth_backend, AuthBackend::Static);
    assert!(config.users.is_empty());
    assert!(!config.request_log_enabled);
}

#[test]
fn test_overrides() {
    let config = config_from(&[
        ("BIND_ADDR", "127.0.0.1:8080"),
        ("AUTH_BACKEND", "database"),
        ("REQUEST_LOG_ENABLED", "true"),
        ("SESSION_TTL_SECS", "30"),
        ("HOME_PAGE", "FrontPage"),
    ])
    .unwrap();

    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(config.auth_backend, AuthBackend::Database);
    assert!(config.request_log_enabled);
    assert_eq!(config.session_ttl, Duration::from_secs(30));
    assert_eq!(config.home_page, "FrontPage");
}

#[test]
fn test_invalid_values_are_errors() {
    assert!(config_from(&[("AUTH_BACKEND", "ldap")]).is_err());
    assert!(config_from(&[("MAX_CONNECTIONS", "many")]).is_err());
    assert!(config_from(&[("BIND_ADDR", "nowhere")]).is_err());
    assert!(config_from(&[("SESSION_REAP_INTERVAL_SECS", "0")]).is_err());
}

// a session must live at least a second and at most a year
#[test]
fn test_session_ttl_bounds() {
    assert!(config_from(&[("SESSION_TTL_SECS", "0")]).is_err());
    assert!(config_from(&[("SESSION_TTL_SECS", "18446744073709551615")]).is_err());

    let longest = config_from(&[("SESSION_TTL_SECS", "31536000")]).unwrap();
    assert_eq!(longest.session_ttl, Duration::from_secs(31_536_000));
}

#[test]
fn test_parse_credentials() {
    let users = parse_credentials(" kyle:the:password , admin:letmein ,").unwrap();

    assert_eq!(
        users,
        vec![
            Credential {
                username: "kyle".into(),
                password: "the:password".into(),
            },
            Credential {
                username: "admin".into(),
                password: "letmein".into(),
            },
        ]
    );
}

#[test]
fn test_parse_credentials_rejects_malformed_entries() {
    assert!(parse_credentials("no-colon").is_err());
    assert!(parse_credentials(":password-only").is_err());
    assert!(parse_credentials("").unwrap().is_empty());
}
