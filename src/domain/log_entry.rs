use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    // "METHOD /path"
    pub log: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn for_request(method: &http::Method, path: &str) -> Self {
        Self {
            log: format!("{} {}", method, path),
            timestamp: Utc::now(),
        }
    }
}
