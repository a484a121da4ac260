use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use crate::models::card::Card;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct List {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub board_index: i64,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateList {
    pub board_id: Uuid,
    pub title: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateList {
    pub title: Option<String>,
    pub board_index: Option<i64>,
}

/// A list with its cards nested in display order.
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ListWithCards {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub board_index: i64,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
    pub cards: Vec<Card>,
}

impl ListWithCards {
    pub fn new(list: List, cards: Vec<Card>) -> Self {
        ListWithCards {
            id: list.id,
            board_id: list.board_id,
            title: list.title,
            board_index: list.board_index,
            created_at: list.created_at,
            updated_at: list.updated_at,
            cards,
        }
    }
}

const SELECT_COLUMNS: &str = "id, board_id, title, board_index, created_at, updated_at";

impl List {
    /// Append a new list at the end of its board.
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateList,
        list_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lists WHERE board_id = $1")
            .bind(data.board_id)
            .fetch_one(&mut *tx)
            .await?;

        let list = sqlx::query_as::<_, List>(&format!(
            r#"INSERT INTO lists (id, board_id, title, board_index)
               VALUES ($1, $2, $3, $4)
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(list_id)
        .bind(data.board_id)
        .bind(&data.title)
        .bind(count)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(list)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, List>(&format!(
            "SELECT {SELECT_COLUMNS} FROM lists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Resolve a list only if its board belongs to the given user.
    pub async fn find_by_id_for_user(
        pool: &SqlitePool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, List>(
            r#"SELECT l.id, l.board_id, l.title, l.board_index, l.created_at, l.updated_at
               FROM lists l
               JOIN boards b ON b.id = l.board_id
               WHERE l.id = $1 AND b.user_id = $2"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_board_id(
        pool: &SqlitePool,
        board_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, List>(&format!(
            "SELECT {SELECT_COLUMNS} FROM lists WHERE board_id = $1 ORDER BY board_index"
        ))
        .bind(board_id)
        .fetch_all(pool)
        .await
    }

    /// Every list on any board owned by the user, ordered within each board.
    pub async fn find_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, List>(
            r#"SELECT l.id, l.board_id, l.title, l.board_index, l.created_at, l.updated_at
               FROM lists l
               JOIN boards b ON b.id = l.board_id
               WHERE b.user_id = $1
               ORDER BY l.board_index"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Rename and/or move a list within its board. Moves reassign the
    /// `board_index` of every sibling between the old and new position so
    /// indices stay dense; out-of-range targets are clamped.
    pub async fn update(
        self,
        pool: &SqlitePool,
        data: &UpdateList,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let title = data.title.as_deref().unwrap_or(&self.title);

        let mut new_index = self.board_index;
        if let Some(target) = data.board_index {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lists WHERE board_id = $1")
                .bind(self.board_id)
                .fetch_one(&mut *tx)
                .await?;
            new_index = target.clamp(0, count - 1);
        }

        if new_index > self.board_index {
            sqlx::query(
                r#"UPDATE lists
                   SET board_index = board_index - 1,
                       updated_at = datetime('now', 'subsec')
                   WHERE board_id = $1 AND board_index > $2 AND board_index <= $3"#,
            )
            .bind(self.board_id)
            .bind(self.board_index)
            .bind(new_index)
            .execute(&mut *tx)
            .await?;
        } else if new_index < self.board_index {
            sqlx::query(
                r#"UPDATE lists
                   SET board_index = board_index + 1,
                       updated_at = datetime('now', 'subsec')
                   WHERE board_id = $1 AND board_index >= $2 AND board_index < $3"#,
            )
            .bind(self.board_id)
            .bind(new_index)
            .bind(self.board_index)
            .execute(&mut *tx)
            .await?;
        }

        let list = sqlx::query_as::<_, List>(&format!(
            r#"UPDATE lists
               SET title = $2,
                   board_index = $3,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(self.id)
        .bind(title)
        .bind(new_index)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(list)
    }

    /// Delete a list and close the index gap it leaves behind.
    pub async fn delete(self, pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(self.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"UPDATE lists
               SET board_index = board_index - 1,
                   updated_at = datetime('now', 'subsec')
               WHERE board_id = $1 AND board_index > $2"#,
        )
        .bind(self.board_id)
        .bind(self.board_index)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
