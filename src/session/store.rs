use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

// longest lifetime a session may be given
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Per-browser state held on the server. The browser only ever sees the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    /// Set once the browser has logged in.
    pub user: Option<String>,
    /// Where to send the browser after a successful login.
    pub request_url: Option<String>,
}

#[derive(Debug)]
struct SessionEntry {
    data: SessionData,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-memory session map with a fixed lifetime counted from creation.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: ttl.min(MAX_SESSION_TTL),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolves the id presented by the browser to a live session, or starts a
    /// new one. The flag is `true` when a new session (and so a new cookie) was made.
    pub async fn load_or_create(self: &Arc<Self>, presented_id: Option<&str>) -> (Session, bool) {
        if let Some(id) = presented_id {
            if self.get(id).await.is_some() {
                return (self.handle(id.to_string()), false);
            }
        }

        let id = Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        let entry = SessionEntry {
            data: SessionData::default(),
            // a deadline the clock cannot represent leaves the session already expired
            expires_at: now.checked_add(self.ttl).unwrap_or(now),
        };
        self.sessions.write().await.insert(id.clone(), entry);
        tracing::debug!(session = %id, "session created");

        (self.handle(id), true)
    }

    fn handle(self: &Arc<Self>, id: String) -> Session {
        Session {
            id,
            store: Arc::clone(self),
        }
    }

    /// Returns a copy of the session's data, dropping it if it has expired.
    pub async fn get(&self, id: &str) -> Option<SessionData> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                None => return None,
                Some(entry) if entry.is_live(now) => return Some(entry.data.clone()),
                Some(_) => {}
            }
        }

        self.sessions.write().await.remove(id);
        tracing::debug!(session = %id, "session expired");
        None
    }

    /// Applies `mutate` to a live session. Returns `false` when the session is gone.
    pub async fn update<F>(&self, id: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut SessionData),
    {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(entry) if entry.is_live(now) => {
                mutate(&mut entry.data);
                true
            }
            _ => false,
        }
    }

    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.is_live(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// A request's view of its session; cheap to clone.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    store: Arc<SessionStore>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn data(&self) -> SessionData {
        self.store.get(&self.id).await.unwrap_or_default()
    }

    pub async fn user(&self) -> Option<String> {
        self.data().await.user
    }

    pub async fn set_user(&self, user: Option<String>) {
        self.store.update(&self.id, |data| data.user = user).await;
    }

    // reads and clears the stashed target in one step
    pub async fn take_request_url(&self) -> Option<String> {
        let mut taken = None;
        self.store
            .update(&self.id, |data| taken = data.request_url.take())
            .await;
        taken
    }

    pub async fn set_request_url(&self, url: String) {
        self.store
            .update(&self.id, |data| data.request_url = Some(url))
            .await;
    }
}

/// Spawns a background task that periodically drops expired sessions.
pub fn spawn_session_reaper(store: Arc<SessionStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "expired sessions purged");
            }
        }
    })
}
