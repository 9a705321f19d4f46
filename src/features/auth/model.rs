use crate::domain::User;
use derive_more::derive::Display;
use serde::Deserialize;

// row shape of the `users` table
#[derive(sqlx::FromRow, Eq, PartialEq, Clone, Debug, Display)]
#[display("{}", username)]
pub struct DbUser {
    pub username: String,
    pub password: String,
}

impl From<DbUser> for User {
    fn from(db_user: DbUser) -> Self {
        User {
            username: db_user.username,
            password: db_user.password,
        }
    }
}

// body of POST /login-submit; absent fields never match a user
#[derive(Deserialize, Debug, Default)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
