//! The travel log: a user's photo-journal entries. Image capture happens on
//! the client; the server only keeps the resulting URL (or data URL) next to
//! the title and story text.

use crate::{Database, Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteQueryResult;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct TravelLog {
    pub id: String,
    pub userid: i64,
    pub title: String,
    pub content: Option<String>,
    pub image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

impl TravelLog {
    pub fn new(userid: i64, title: String, content: Option<String>, image_url: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            userid,
            title,
            content,
            image_url,
            created: OffsetDateTime::now_utc(),
        }
    }

    /// Newest first, the order the journal grid renders in.
    pub async fn fetch_all_user(userid: i64, db: &Database) -> Result<Vec<TravelLog>> {
        Ok(sqlx::query_as(
            r#"SELECT id, userid, title, content, image_url, created
               FROM tm_travel_logs WHERE userid=? ORDER BY created DESC, id ASC"#,
        )
        .bind(userid)
        .fetch_all(db.pool())
        .await?)
    }

    pub async fn fetch(id: &str, db: &Database) -> Result<TravelLog> {
        Ok(sqlx::query_as(
            r#"SELECT id, userid, title, content, image_url, created
               FROM tm_travel_logs WHERE id=?"#,
        )
        .bind(id)
        .fetch_one(db.pool())
        .await?)
    }

    /// A post needs at least a title and an image; the story text is
    /// optional.
    pub async fn insert(&self, db: &Database) -> Result<SqliteQueryResult> {
        if self.title.is_empty() {
            return Err(Error::InvalidOperation(
                "a travel log needs a title".to_string(),
            ));
        }
        if self.image_url.is_empty() {
            return Err(Error::InvalidOperation(
                "a travel log needs an image".to_string(),
            ));
        }
        sqlx::query(
            r#"INSERT INTO tm_travel_logs (id, userid, title, content, image_url, created)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&self.id)
        .bind(self.userid)
        .bind(&self.title)
        .bind(&self.content)
        .bind(&self.image_url)
        .bind(self.created)
        .execute(db.pool())
        .await
        .map_err(|e| e.into())
    }

    pub async fn delete(&self, db: &Database) -> Result<SqliteQueryResult> {
        sqlx::query("DELETE FROM tm_travel_logs WHERE id=?")
            .bind(&self.id)
            .execute(db.pool())
            .await
            .map_err(|e| e.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sqlx::{Pool, Sqlite};
    use test_log::test;

    #[test(sqlx::test(
        migrations = "../db/migrations/",
        fixtures(path = "../../db/fixtures", scripts("users"))
    ))]
    async fn create_and_list(pool: Pool<Sqlite>) {
        let db = Database::from(pool);
        let older = TravelLog {
            created: OffsetDateTime::now_utc() - time::Duration::days(1),
            ..TravelLog::new(1, "Day one".into(), None, "data:image/png;one".into())
        };
        older.insert(&db).await.expect("failed to insert log");
        let newer = TravelLog::new(
            1,
            "Day two".into(),
            Some("Snorkeling at the cape".into()),
            "data:image/png;two".into(),
        );
        newer.insert(&db).await.expect("failed to insert log");

        let logs = TravelLog::fetch_all_user(1, &db)
            .await
            .expect("failed to list logs");
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].title, "Day two");
        assert_eq!(logs[1].title, "Day one");

        // other users see nothing
        let logs = TravelLog::fetch_all_user(2, &db)
            .await
            .expect("failed to list logs");
        assert!(logs.is_empty());
    }

    #[test(sqlx::test(
        migrations = "../db/migrations/",
        fixtures(path = "../../db/fixtures", scripts("users"))
    ))]
    async fn title_and_image_are_required(pool: Pool<Sqlite>) {
        let db = Database::from(pool);
        let no_title = TravelLog::new(1, String::new(), None, "img".into());
        assert!(matches!(
            no_title.insert(&db).await,
            Err(Error::InvalidOperation(_))
        ));
        let no_image = TravelLog::new(1, "Title".into(), None, String::new());
        assert!(matches!(
            no_image.insert(&db).await,
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test(sqlx::test(
        migrations = "../db/migrations/",
        fixtures(path = "../../db/fixtures", scripts("users"))
    ))]
    async fn delete_by_id(pool: Pool<Sqlite>) {
        let db = Database::from(pool);
        let log = TravelLog::new(1, "Ephemeral".into(), None, "img".into());
        log.insert(&db).await.expect("failed to insert log");

        let loaded = TravelLog::fetch(&log.id, &db)
            .await
            .expect("failed to fetch log");
        assert_eq!(loaded.title, "Ephemeral");

        loaded.delete(&db).await.expect("failed to delete log");
        assert!(matches!(
            TravelLog::fetch(&log.id, &db).await,
            Err(Error::DatabaseRowNotFound(_))
        ));
    }
}
