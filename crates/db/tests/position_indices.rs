//! Integration tests for position-index maintenance: appends, moves within
//! and across parents, clamping, and gap closing on delete.

use std::str::FromStr;

use db::models::{
    board::{Board, CreateBoard},
    card::{Card, CreateCard, UpdateCard},
    list::{CreateList, List, UpdateList},
    user::{CreateUser, User},
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
};
use tempfile::TempDir;
use uuid::Uuid;

async fn setup_test_pool() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let options =
        SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.to_string_lossy()))
            .expect("Invalid database URL")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePool::connect_with(options)
        .await
        .expect("Failed to create pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    (pool, temp_dir)
}

/// One user, one board; returns the board id.
async fn setup_board(pool: &SqlitePool) -> Uuid {
    let user = User::create(
        pool,
        &CreateUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
        },
        Uuid::new_v4(),
    )
    .await
    .expect("Failed to create user");

    Board::create(
        pool,
        user.id,
        &CreateBoard {
            title: "Board".to_string(),
        },
        Uuid::new_v4(),
    )
    .await
    .expect("Failed to create board")
    .id
}

async fn create_list(pool: &SqlitePool, board_id: Uuid, title: &str) -> List {
    List::create(
        pool,
        &CreateList {
            board_id,
            title: title.to_string(),
        },
        Uuid::new_v4(),
    )
    .await
    .expect("Failed to create list")
}

async fn create_card(pool: &SqlitePool, list_id: Uuid, title: &str) -> Card {
    Card::create(
        pool,
        &CreateCard {
            list_id,
            title: title.to_string(),
        },
        Uuid::new_v4(),
    )
    .await
    .expect("Failed to create card")
}

/// Titles of a board's lists in board_index order, with density asserted.
async fn list_titles(pool: &SqlitePool, board_id: Uuid) -> Vec<String> {
    let lists = List::find_by_board_id(pool, board_id)
        .await
        .expect("Failed to fetch lists");
    for (i, list) in lists.iter().enumerate() {
        assert_eq!(list.board_index, i as i64, "indices must stay dense");
    }
    lists.into_iter().map(|l| l.title).collect()
}

async fn card_titles(pool: &SqlitePool, list: &List) -> Vec<String> {
    let cards = Card::find_by_board_id(pool, list.board_id, db::models::card::CardFilter::All)
        .await
        .expect("Failed to fetch cards");
    let mut titles = Vec::new();
    let mut expected_index = 0;
    for card in cards.into_iter().filter(|c| c.list_id == list.id) {
        assert_eq!(card.list_index, expected_index, "indices must stay dense");
        expected_index += 1;
        titles.push(card.title);
    }
    titles
}

fn move_list(index: i64) -> UpdateList {
    UpdateList {
        title: None,
        board_index: Some(index),
    }
}

fn move_card(list_id: Option<Uuid>, index: Option<i64>) -> UpdateCard {
    UpdateCard {
        title: None,
        completed: None,
        list_id,
        list_index: index,
    }
}

#[tokio::test]
async fn test_lists_append_at_end() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board_id = setup_board(&pool).await;

    let a = create_list(&pool, board_id, "a").await;
    let b = create_list(&pool, board_id, "b").await;
    let c = create_list(&pool, board_id, "c").await;

    assert_eq!(a.board_index, 0);
    assert_eq!(b.board_index, 1);
    assert_eq!(c.board_index, 2);
}

#[tokio::test]
async fn test_list_move_forward_and_back() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board_id = setup_board(&pool).await;

    let a = create_list(&pool, board_id, "a").await;
    create_list(&pool, board_id, "b").await;
    create_list(&pool, board_id, "c").await;

    // a: 0 -> 2
    let a = a.update(&pool, &move_list(2)).await.expect("move failed");
    assert_eq!(a.board_index, 2);
    assert_eq!(list_titles(&pool, board_id).await, vec!["b", "c", "a"]);

    // a: 2 -> 0
    let a = a.update(&pool, &move_list(0)).await.expect("move failed");
    assert_eq!(a.board_index, 0);
    assert_eq!(list_titles(&pool, board_id).await, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_list_move_clamps_out_of_range() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board_id = setup_board(&pool).await;

    let a = create_list(&pool, board_id, "a").await;
    create_list(&pool, board_id, "b").await;

    let a = a.update(&pool, &move_list(99)).await.expect("move failed");
    assert_eq!(a.board_index, 1);

    let a = a.update(&pool, &move_list(-5)).await.expect("move failed");
    assert_eq!(a.board_index, 0);
    assert_eq!(list_titles(&pool, board_id).await, vec!["a", "b"]);
}

#[tokio::test]
async fn test_list_delete_closes_gap() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board_id = setup_board(&pool).await;

    create_list(&pool, board_id, "a").await;
    let b = create_list(&pool, board_id, "b").await;
    create_list(&pool, board_id, "c").await;

    b.delete(&pool).await.expect("delete failed");
    assert_eq!(list_titles(&pool, board_id).await, vec!["a", "c"]);
}

#[tokio::test]
async fn test_card_move_within_list() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board_id = setup_board(&pool).await;
    let list = create_list(&pool, board_id, "todo").await;

    let one = create_card(&pool, list.id, "one").await;
    create_card(&pool, list.id, "two").await;
    create_card(&pool, list.id, "three").await;

    let one = one
        .update(&pool, &move_card(None, Some(2)))
        .await
        .expect("move failed");
    assert_eq!(one.list_index, 2);
    assert_eq!(card_titles(&pool, &list).await, vec!["two", "three", "one"]);
}

#[tokio::test]
async fn test_card_move_across_lists() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board_id = setup_board(&pool).await;
    let todo = create_list(&pool, board_id, "todo").await;
    let doing = create_list(&pool, board_id, "doing").await;

    create_card(&pool, todo.id, "one").await;
    let two = create_card(&pool, todo.id, "two").await;
    create_card(&pool, todo.id, "three").await;
    create_card(&pool, doing.id, "busy").await;

    // Move into the middle of the other list
    let two = two
        .update(&pool, &move_card(Some(doing.id), Some(0)))
        .await
        .expect("move failed");
    assert_eq!(two.list_id, doing.id);
    assert_eq!(two.list_index, 0);

    assert_eq!(card_titles(&pool, &todo).await, vec!["one", "three"]);
    assert_eq!(card_titles(&pool, &doing).await, vec!["two", "busy"]);
}

#[tokio::test]
async fn test_card_move_across_lists_defaults_to_end() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board_id = setup_board(&pool).await;
    let todo = create_list(&pool, board_id, "todo").await;
    let doing = create_list(&pool, board_id, "doing").await;

    let one = create_card(&pool, todo.id, "one").await;
    create_card(&pool, doing.id, "busy").await;

    let one = one
        .update(&pool, &move_card(Some(doing.id), None))
        .await
        .expect("move failed");
    assert_eq!(one.list_index, 1);
    assert_eq!(card_titles(&pool, &doing).await, vec!["busy", "one"]);
}

#[tokio::test]
async fn test_card_delete_closes_gap() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let board_id = setup_board(&pool).await;
    let list = create_list(&pool, board_id, "todo").await;

    create_card(&pool, list.id, "one").await;
    let two = create_card(&pool, list.id, "two").await;
    create_card(&pool, list.id, "three").await;

    two.delete(&pool).await.expect("delete failed");
    assert_eq!(card_titles(&pool, &list).await, vec!["one", "three"]);
}
