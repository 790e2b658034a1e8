//! A map user, keyed by the identity provider's `sub` claim. The row also
//! carries the user's map settings, which is the only state the app keeps
//! about a person beyond their favorites and travel logs.

use crate::{
    Database, Error, Result,
    category::{self, Category, DEFAULT_SELECTED},
};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteQueryResult;

#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[sqlx(rename = "userid")]
    pub id: i64,
    pub sub: String,
    pub email: Option<String>,
    /// comma-joined category ids, e.g. "1,2,3,5,6,9"
    pub selected_categories: String,
    pub show_marker_titles: bool,
}

impl User {
    pub fn new(sub: String, email: Option<String>) -> Self {
        Self {
            id: -1,
            sub,
            email,
            selected_categories: category::join_id_list(&DEFAULT_SELECTED),
            show_marker_titles: false,
        }
    }

    pub async fn load_by_sub(sub: &str, db: &Database) -> Result<Option<User>> {
        Ok(sqlx::query_as(
            r#"SELECT id as userid, sub, email, selected_categories, show_marker_titles
               FROM tm_users WHERE sub=?"#,
        )
        .bind(sub)
        .fetch_optional(db.pool())
        .await?)
    }

    /// Create the row on first login, or pick up a changed email address on
    /// subsequent ones. Settings are left alone either way.
    pub async fn upsert(sub: &str, email: Option<&str>, db: &Database) -> Result<User> {
        sqlx::query(
            r#"INSERT INTO tm_users (sub, email, selected_categories, show_marker_titles)
               VALUES (?, ?, ?, 0)
               ON CONFLICT(sub) DO UPDATE SET email=excluded.email"#,
        )
        .bind(sub)
        .bind(email)
        .bind(category::join_id_list(&DEFAULT_SELECTED))
        .execute(db.pool())
        .await?;
        Self::load_by_sub(sub, db)
            .await?
            .ok_or(Error::DatabaseRowNotFound(sqlx::Error::RowNotFound))
    }

    pub async fn update_settings(&self, db: &Database) -> Result<SqliteQueryResult> {
        if self.id < 0 {
            return Err(Error::InvalidOperation(
                "cannot update settings for an unsaved user".to_string(),
            ));
        }
        sqlx::query("UPDATE tm_users SET selected_categories=?, show_marker_titles=? WHERE id=?")
            .bind(&self.selected_categories)
            .bind(self.show_marker_titles)
            .bind(self.id)
            .execute(db.pool())
            .await
            .map_err(|e| e.into())
    }

    pub fn selected(&self) -> Vec<Category> {
        category::parse_id_list(&self.selected_categories)
    }

    pub fn set_selected(&mut self, categories: &[Category]) {
        self.selected_categories = category::join_id_list(categories);
    }
}
