use crate::database::{PageRepository, RequestLogRepository, UserRepository};
use crate::domain::{LogEntry, Page, User};
use crate::features::auth::model::DbUser;
use crate::features::pages::model::DbPage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

#[derive(Clone)]
pub struct SqliteRepository {
    pool: Pool<Sqlite>,
}

impl SqliteRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

// create the database if needed, open a pool and bring the schema up to date
pub async fn connect(database_url: &str, max_connections: u32) -> Result<Pool<Sqlite>> {
    let exists = Sqlite::database_exists(database_url).await.unwrap_or(false);
    if !exists {
        tracing::info!(database_url, "database not found, creating");
        Sqlite::create_database(database_url)
            .await
            .with_context(|| format!("Unable to create database at {}", database_url))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .with_context(|| format!("Failed to create pool on {}", database_url))?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

#[async_trait]
impl PageRepository for SqliteRepository {
    async fn get_page(&self, id: &str) -> Result<Option<Page>> {
        // plain `=` keeps the BINARY collation, so page names stay case-sensitive
        let db_page_opt = sqlx::query_as::<_, DbPage>("SELECT id, content FROM pages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to load page {}", id))?;

        Ok(db_page_opt.map(Page::from))
    }

    async fn get_all_pages(&self) -> Result<Vec<Page>> {
        let db_pages = sqlx::query_as::<_, DbPage>("SELECT id, content FROM pages")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list pages")?;

        Ok(db_pages.into_iter().map(Page::from).collect())
    }

    async fn upsert_page(&self, page: &Page) -> Result<()> {
        let db_page: DbPage = page.into();

        // single statement, so concurrent saves to one id are last-write-wins
        sqlx::query(
            r#"
            INSERT INTO pages (id, content)
            VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET
                content = excluded.content
            "#,
        )
        .bind(&db_page.id)
        .bind(&db_page.content)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save page {}", db_page))?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, username: &str) -> Result<Option<User>> {
        let db_user_opt =
            sqlx::query_as::<_, DbUser>("SELECT username, password FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Failed to load user {}", username))?;

        Ok(db_user_opt.map(User::from))
    }

    async fn seed_user(&self, user: &User) -> Result<()> {
        sqlx::query("INSERT INTO users (username, password) VALUES (?, ?) ON CONFLICT(username) DO NOTHING")
            .bind(&user.username)
            .bind(&user.password)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to seed user {}", user.username))?;

        Ok(())
    }
}

#[async_trait]
impl RequestLogRepository for SqliteRepository {
    async fn append(&self, entry: &LogEntry) -> Result<()> {
        sqlx::query("INSERT INTO request_logs (log, timestamp) VALUES (?, ?)")
            .bind(&entry.log)
            .bind(entry.timestamp)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to append request log '{}'", entry.log))?;

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM request_logs")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count request logs")?;

        Ok(count)
    }
}
