use crate::domain::{LogEntry, Page, User};
use anyhow::Result;
use async_trait::async_trait;

pub mod sqlite;

// repositories are shared between request tasks behind an Arc
// sqlx::Pool is thread safe, so the sqlite implementation is just a pool handle
#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn get_page(&self, id: &str) -> Result<Option<Page>>;
    async fn get_all_pages(&self) -> Result<Vec<Page>>;

    // insert, or overwrite the content of the page with the same id
    async fn upsert_page(&self, page: &Page) -> Result<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<Option<User>>;

    // insert if absent, an existing user is left untouched
    async fn seed_user(&self, user: &User) -> Result<()>;
}

// append-only, no route ever reads it back
#[async_trait]
pub trait RequestLogRepository: Send + Sync {
    async fn append(&self, entry: &LogEntry) -> Result<()>;
    async fn count(&self) -> Result<i64>;
}
