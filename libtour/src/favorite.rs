//! Per-user favorites, stored as (user, pin id) pairs. The pin id is the
//! external identifier a feed location carries in `pin_id`; resolving pins
//! back to canonical locations happens against the in-memory feed cache.

use crate::{Database, Result};
use serde::Serialize;
use sqlx::sqlite::SqliteQueryResult;

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Favorite {
    #[sqlx(rename = "favid")]
    pub id: i64,
    pub userid: i64,
    pub pin_id: String,
}

impl Favorite {
    pub async fn fetch_all_user(userid: i64, db: &Database) -> Result<Vec<Favorite>> {
        Ok(sqlx::query_as(
            "SELECT id as favid, userid, pin_id FROM tm_favorites WHERE userid=? ORDER BY id ASC",
        )
        .bind(userid)
        .fetch_all(db.pool())
        .await?)
    }

    /// Just the pin ids, the shape the map layer wants for marker styling.
    pub async fn pin_ids(userid: i64, db: &Database) -> Result<Vec<String>> {
        Ok(sqlx::query_scalar(
            "SELECT pin_id FROM tm_favorites WHERE userid=? ORDER BY id ASC",
        )
        .bind(userid)
        .fetch_all(db.pool())
        .await?)
    }

    /// Idempotent: favoriting an already-favorited pin is a no-op.
    pub async fn insert(userid: i64, pin_id: &str, db: &Database) -> Result<SqliteQueryResult> {
        sqlx::query("INSERT OR IGNORE INTO tm_favorites (userid, pin_id) VALUES (?, ?)")
            .bind(userid)
            .bind(pin_id)
            .execute(db.pool())
            .await
            .map_err(|e| e.into())
    }

    pub async fn delete(userid: i64, pin_id: &str, db: &Database) -> Result<SqliteQueryResult> {
        sqlx::query("DELETE FROM tm_favorites WHERE userid=? AND pin_id=?")
            .bind(userid)
            .bind(pin_id)
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
        fixtures(path = "../../db/fixtures", scripts("users", "favorites"))
    ))]
    async fn fetch_is_scoped_to_user(pool: Pool<Sqlite>) {
        let db = Database::from(pool);
        let pins = Favorite::pin_ids(1, &db).await.expect("failed to fetch pins");
        assert_eq!(pins, ["pin-1", "pin-2"]);
        let pins = Favorite::pin_ids(2, &db).await.expect("failed to fetch pins");
        assert_eq!(pins, ["pin-9"]);
    }

    #[test(sqlx::test(
        migrations = "../db/migrations/",
        fixtures(path = "../../db/fixtures", scripts("users", "favorites"))
    ))]
    async fn insert_is_idempotent(pool: Pool<Sqlite>) {
        let db = Database::from(pool);
        Favorite::insert(1, "pin-3", &db)
            .await
            .expect("failed to add favorite");
        Favorite::insert(1, "pin-3", &db)
            .await
            .expect("re-adding favorite should not fail");
        let pins = Favorite::pin_ids(1, &db).await.expect("failed to fetch pins");
        assert_eq!(pins, ["pin-1", "pin-2", "pin-3"]);
    }

    #[test(sqlx::test(
        migrations = "../db/migrations/",
        fixtures(path = "../../db/fixtures", scripts("users", "favorites"))
    ))]
    async fn delete_removes_only_the_pair(pool: Pool<Sqlite>) {
        let db = Database::from(pool);
        // pin-9 belongs to user 2; deleting it as user 1 touches nothing
        let result = Favorite::delete(1, "pin-9", &db)
            .await
            .expect("failed to run delete");
        assert_eq!(result.rows_affected(), 0);

        Favorite::delete(1, "pin-1", &db)
            .await
            .expect("failed to delete favorite");
        let pins = Favorite::pin_ids(1, &db).await.expect("failed to fetch pins");
        assert_eq!(pins, ["pin-2"]);
    }
}
