use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use crate::models::{
    card::{Card, CardFilter},
    list::{List, ListWithCards},
};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Board {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateBoard {
    pub title: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateBoard {
    pub title: Option<String>,
}

/// A board with its lists and cards nested in display order.
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct BoardWithLists {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
    pub lists: Vec<ListWithCards>,
}

impl Board {
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        data: &CreateBoard,
        board_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"INSERT INTO boards (id, user_id, title)
               VALUES ($1, $2, $3)
               RETURNING id, user_id, title, created_at, updated_at"#,
        )
        .bind(board_id)
        .bind(user_id)
        .bind(&data.title)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"SELECT id, user_id, title, created_at, updated_at
               FROM boards
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All boards of a user, most recently touched first.
    pub async fn find_all_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"SELECT id, user_id, title, created_at, updated_at
               FROM boards
               WHERE user_id = $1
               ORDER BY updated_at DESC, title"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        title: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"UPDATE boards
               SET title = $2,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING id, user_id, title, created_at, updated_at"#,
        )
        .bind(id)
        .bind(title)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// All boards of a user with lists and cards nested, three queries total.
    pub async fn find_all_with_content(
        pool: &SqlitePool,
        user_id: Uuid,
        filter: CardFilter,
    ) -> Result<Vec<BoardWithLists>, sqlx::Error> {
        let boards = Self::find_all_for_user(pool, user_id).await?;
        let lists = List::find_for_user(pool, user_id).await?;
        let cards = Card::find_for_user(pool, user_id, filter).await?;
        Ok(assemble(boards, lists, cards))
    }

    /// A single board with its content nested.
    pub async fn with_content(
        self,
        pool: &SqlitePool,
        filter: CardFilter,
    ) -> Result<BoardWithLists, sqlx::Error> {
        let lists = List::find_by_board_id(pool, self.id).await?;
        let cards = Card::find_by_board_id(pool, self.id, filter).await?;
        let mut nested = assemble(vec![self], lists, cards);
        // assemble keeps one entry per input board
        Ok(nested.remove(0))
    }
}

/// Group flat query results into the nested response shape. Input ordering
/// (boards by recency, lists by board_index, cards by list_index) is
/// preserved.
fn assemble(boards: Vec<Board>, lists: Vec<List>, cards: Vec<Card>) -> Vec<BoardWithLists> {
    let mut cards_by_list: HashMap<Uuid, Vec<Card>> = HashMap::new();
    for card in cards {
        cards_by_list.entry(card.list_id).or_default().push(card);
    }

    let mut lists_by_board: HashMap<Uuid, Vec<ListWithCards>> = HashMap::new();
    for list in lists {
        let cards = cards_by_list.remove(&list.id).unwrap_or_default();
        lists_by_board
            .entry(list.board_id)
            .or_default()
            .push(ListWithCards::new(list, cards));
    }

    boards
        .into_iter()
        .map(|board| {
            let lists = lists_by_board.remove(&board.id).unwrap_or_default();
            BoardWithLists {
                id: board.id,
                user_id: board.user_id,
                title: board.title,
                created_at: board.created_at,
                updated_at: board.updated_at,
                lists,
            }
        })
        .collect()
}
