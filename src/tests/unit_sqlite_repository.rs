use crate::database::sqlite::{SqliteRepository, connect};
use crate::database::{PageRepository, RequestLogRepository, UserRepository};
use crate::domain::{LogEntry, Page, User};
use crate::features::auth::credentials::{RepositoryCredentials, authenticate};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

// create a sqlite database in memory to test against
async fn setup_test_db() -> SqliteRepository {
    // a single connection, every new connection to :memory: is a separate database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    // run migrations to create the schema
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    SqliteRepository::new(pool)
}

#[tokio::test]
async fn test_sqlite_save_and_retrieve() {
    let repo = setup_test_db().await;

    repo.upsert_page(&Page::new("HomePage", "# Hello"))
        .await
        .expect("Should save page");

    let retrieved = repo
        .get_page("HomePage")
        .await
        .expect("Should query")
        .expect("Should find page");

    assert_eq!(retrieved, Page::new("HomePage", "# Hello"));
}

#[tokio::test]
async fn test_sqlite_missing_page_is_none() {
    let repo = setup_test_db().await;

    assert!(repo.get_page("NoSuchPage").await.unwrap().is_none());
}

// two saves to the same id leave one row holding the second content
#[tokio::test]
async fn test_sqlite_upsert_is_last_write_wins() {
    let repo = setup_test_db().await;

    repo.upsert_page(&Page::new("Twice", "c1")).await.unwrap();
    repo.upsert_page(&Page::new("Twice", "c2")).await.unwrap();

    let all = repo.get_all_pages().await.unwrap();
    assert_eq!(all, vec![Page::new("Twice", "c2")]);
}

// ids are matched exactly, unlike a LIKE lookup
#[tokio::test]
async fn test_sqlite_lookup_is_case_sensitive() {
    let repo = setup_test_db().await;
    repo.upsert_page(&Page::new("HomePage", "upper")).await.unwrap();
    repo.upsert_page(&Page::new("homepage", "lower")).await.unwrap();

    assert_eq!(repo.get_page("HomePage").await.unwrap().unwrap().content, "upper");
    assert_eq!(repo.get_page("homepage").await.unwrap().unwrap().content, "lower");
    assert!(repo.get_page("HOMEPAGE").await.unwrap().is_none());
    assert_eq!(repo.get_all_pages().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_sqlite_empty_content_is_stored() {
    let repo = setup_test_db().await;

    repo.upsert_page(&Page::new("Blank", "")).await.unwrap();

    assert_eq!(repo.get_page("Blank").await.unwrap().unwrap().content, "");
}

// seeding never overwrites an existing password
#[tokio::test]
async fn test_sqlite_seed_user_is_insert_only() {
    let repo = setup_test_db().await;

    repo.seed_user(&User { username: "editor".into(), password: "first".into() })
        .await
        .unwrap();
    repo.seed_user(&User { username: "editor".into(), password: "second".into() })
        .await
        .unwrap();

    let user = repo.get_user("editor").await.unwrap().unwrap();
    assert_eq!(user.password, "first");
    assert!(repo.get_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_repository_credentials_authenticate() {
    let repo = Arc::new(setup_test_db().await);
    repo.seed_user(&User { username: "editor".into(), password: "letmein".into() })
        .await
        .unwrap();
    let credentials = RepositoryCredentials::new(repo.clone());

    assert!(authenticate(&credentials, "editor", "letmein").await.unwrap());
    assert!(!authenticate(&credentials, "editor", "wrong").await.unwrap());
    // an unknown user is a plain failure, not an error
    assert!(!authenticate(&credentials, "ghost", "").await.unwrap());
}

#[tokio::test]
async fn test_sqlite_request_log_appends() {
    let repo = setup_test_db().await;

    repo.append(&LogEntry::for_request(&http::Method::GET, "/HomePage"))
        .await
        .unwrap();
    repo.append(&LogEntry::for_request(&http::Method::POST, "/HomePage/save"))
        .await
        .unwrap();

    assert_eq!(repo.count().await.unwrap(), 2);
}

// the database file is created on first connect and survives a reconnect
#[tokio::test]
async fn test_sqlite_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("wiki.db").display());

    {
        let repo = SqliteRepository::new(connect(&url, 2).await.unwrap());
        repo.upsert_page(&Page::new("Durable", "still here")).await.unwrap();
    }

    let repo = SqliteRepository::new(connect(&url, 2).await.unwrap());
    assert_eq!(
        repo.get_page("Durable").await.unwrap().unwrap().content,
        "still here"
    );
}
