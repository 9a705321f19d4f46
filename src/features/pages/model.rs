use crate::domain::Page;
use derive_more::derive::Display;
use serde::Deserialize;

// row shape of the `pages` table
#[derive(sqlx::FromRow, Eq, PartialEq, Clone, Debug, Display)]
#[display("{}", id)]
pub struct DbPage {
    pub id: String,
    pub content: String,
}

impl From<DbPage> for Page {
    fn from(db_page: DbPage) -> Self {
        Page {
            id: db_page.id,
            content: db_page.content,
        }
    }
}

impl From<&Page> for DbPage {
    fn from(page: &Page) -> Self {
        DbPage {
            id: page.id.to_owned(),
            content: page.content.to_owned(),
        }
    }
}

// body of POST /{page_name}/save; a missing field saves an empty page
#[derive(Deserialize, Debug, Default)]
pub struct SaveForm {
    #[serde(rename = "pageContent", default)]
    pub page_content: String,
}
