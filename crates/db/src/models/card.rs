use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Card {
    pub id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    pub completed: bool,
    pub list_index: i64,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateCard {
    pub list_id: Uuid,
    pub title: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateCard {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub list_id: Option<Uuid>,
    pub list_index: Option<i64>,
}

/// Which cards to include when nesting boards.
///
/// The login POST response carries only incomplete cards; everything else
/// includes the full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFilter {
    All,
    IncompleteOnly,
}

const SELECT_COLUMNS: &str = "id, list_id, title, completed, list_index, created_at, updated_at";

impl Card {
    /// Append a new card at the end of its list.
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateCard,
        card_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cards WHERE list_id = $1")
            .bind(data.list_id)
            .fetch_one(&mut *tx)
            .await?;

        let card = sqlx::query_as::<_, Card>(&format!(
            r#"INSERT INTO cards (id, list_id, title, completed, list_index)
               VALUES ($1, $2, $3, 0, $4)
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(card_id)
        .bind(data.list_id)
        .bind(&data.title)
        .bind(count)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(card)
    }

    /// Resolve a card only if its board belongs to the given user.
    pub async fn find_by_id_for_user(
        pool: &SqlitePool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Card>(
            r#"SELECT c.id, c.list_id, c.title, c.completed, c.list_index, c.created_at, c.updated_at
               FROM cards c
               JOIN lists l ON l.id = c.list_id
               JOIN boards b ON b.id = l.board_id
               WHERE c.id = $1 AND b.user_id = $2"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Every card on the given board, ordered within each list.
    pub async fn find_by_board_id(
        pool: &SqlitePool,
        board_id: Uuid,
        filter: CardFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let completed_clause = match filter {
            CardFilter::All => "",
            CardFilter::IncompleteOnly => "AND c.completed = 0",
        };
        sqlx::query_as::<_, Card>(&format!(
            r#"SELECT c.id, c.list_id, c.title, c.completed, c.list_index, c.created_at, c.updated_at
               FROM cards c
               JOIN lists l ON l.id = c.list_id
               WHERE l.board_id = $1 {completed_clause}
               ORDER BY c.list_index"#
        ))
        .bind(board_id)
        .fetch_all(pool)
        .await
    }

    /// Every card on any board owned by the user, ordered within each list.
    pub async fn find_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
        filter: CardFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let completed_clause = match filter {
            CardFilter::All => "",
            CardFilter::IncompleteOnly => "AND c.completed = 0",
        };
        sqlx::query_as::<_, Card>(&format!(
            r#"SELECT c.id, c.list_id, c.title, c.completed, c.list_index, c.created_at, c.updated_at
               FROM cards c
               JOIN lists l ON l.id = c.list_id
               JOIN boards b ON b.id = l.board_id
               WHERE b.user_id = $1 {completed_clause}
               ORDER BY c.list_index"#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Edit, toggle completion, and/or move a card.
    ///
    /// Moving within a list shifts the siblings between the old and new
    /// position; moving across lists closes the gap in the source list and
    /// opens one in the target. Both sides keep dense indices. Out-of-range
    /// targets are clamped; the default position for a cross-list move is
    /// the end of the target list.
    ///
    /// The caller is responsible for checking that a target `list_id`
    /// belongs to the same user.
    pub async fn update(self, pool: &SqlitePool, data: &UpdateCard) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let title = data.title.as_deref().unwrap_or(&self.title);
        let completed = data.completed.unwrap_or(self.completed);
        let target_list = data.list_id.unwrap_or(self.list_id);

        let new_index = if target_list == self.list_id {
            let mut new_index = self.list_index;
            if let Some(target) = data.list_index {
                let count: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM cards WHERE list_id = $1")
                        .bind(self.list_id)
                        .fetch_one(&mut *tx)
                        .await?;
                new_index = target.clamp(0, count - 1);
            }

            if new_index > self.list_index {
                sqlx::query(
                    r#"UPDATE cards
                       SET list_index = list_index - 1,
                           updated_at = datetime('now', 'subsec')
                       WHERE list_id = $1 AND list_index > $2 AND list_index <= $3"#,
                )
                .bind(self.list_id)
                .bind(self.list_index)
                .bind(new_index)
                .execute(&mut *tx)
                .await?;
            } else if new_index < self.list_index {
                sqlx::query(
                    r#"UPDATE cards
                       SET list_index = list_index + 1,
                           updated_at = datetime('now', 'subsec')
                       WHERE list_id = $1 AND list_index >= $2 AND list_index < $3"#,
                )
                .bind(self.list_id)
                .bind(new_index)
                .bind(self.list_index)
                .execute(&mut *tx)
                .await?;
            }
            new_index
        } else {
            // Cross-list move: close the gap behind us, open one ahead.
            let target_count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM cards WHERE list_id = $1")
                    .bind(target_list)
                    .fetch_one(&mut *tx)
                    .await?;
            let new_index = data.list_index.unwrap_or(target_count).clamp(0, target_count);

            sqlx::query(
                r#"UPDATE cards
                   SET list_index = list_index - 1,
                       updated_at = datetime('now', 'subsec')
                   WHERE list_id = $1 AND list_index > $2"#,
            )
            .bind(self.list_id)
            .bind(self.list_index)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"UPDATE cards
                   SET list_index = list_index + 1,
                       updated_at = datetime('now', 'subsec')
                   WHERE list_id = $1 AND list_index >= $2"#,
            )
            .bind(target_list)
            .bind(new_index)
            .execute(&mut *tx)
            .await?;

            new_index
        };

        let card = sqlx::query_as::<_, Card>(&format!(
            r#"UPDATE cards
               SET title = $2,
                   completed = $3,
                   list_id = $4,
                   list_index = $5,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(self.id)
        .bind(title)
        .bind(completed)
        .bind(target_list)
        .bind(new_index)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(card)
    }

    /// Delete a card and close the index gap it leaves behind.
    pub async fn delete(self, pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(self.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"UPDATE cards
               SET list_index = list_index - 1,
                   updated_at = datetime('now', 'subsec')
               WHERE list_id = $1 AND list_index > $2"#,
        )
        .bind(self.list_id)
        .bind(self.list_index)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
