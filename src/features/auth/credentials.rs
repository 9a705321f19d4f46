use crate::config::Credential;
use crate::database::UserRepository;
use crate::domain::User;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

// where login looks users up; one implementation per AUTH_BACKEND
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user(&self, username: &str) -> Result<Option<User>>;
}

// users supplied through configuration
pub struct StaticCredentials {
    users: Vec<User>,
}

impl StaticCredentials {
    pub fn new(credentials: &[Credential]) -> Self {
        let users = credentials
            .iter()
            .map(|c| User {
                username: c.username.clone(),
                password: c.password.clone(),
            })
            .collect();

        Self { users }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for StaticCredentials {
    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }
}

// users held in the database
pub struct RepositoryCredentials {
    repo: Arc<dyn UserRepository>,
}

impl RepositoryCredentials {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CredentialStore for RepositoryCredentials {
    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        self.repo.get_user(username).await
    }
}

/// Checks a submitted username/password pair.
///
/// An unknown username is a failed login, the same as a wrong password. The
/// comparison is plaintext equality; nothing here is hardened.
pub async fn authenticate(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<bool> {
    match store.find_user(username).await? {
        Some(user) => Ok(user.password_matches(password)),
        None => Ok(false),
    }
}
