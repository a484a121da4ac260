//! Integration tests for accounts and server-side sessions.

use std::str::FromStr;

use db::models::{
    session::Session,
    user::{CreateUser, User, UserError},
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

async fn create_test_user(pool: &SqlitePool, username: &str, email: &str) -> Result<User, UserError> {
    User::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        },
        Uuid::new_v4(),
    )
    .await
}

#[tokio::test]
async fn test_session_roundtrip() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let user = create_test_user(&pool, "alice", "alice@example.com")
        .await
        .expect("Failed to create user");

    let session = Session::create(&pool, user.id, Uuid::new_v4())
        .await
        .expect("Failed to create session");
    assert!(session.expires_at > session.created_at);

    let (found, found_user) = Session::find_active_with_user(&pool, session.id)
        .await
        .expect("Lookup failed")
        .expect("Session should be live");
    assert_eq!(found.id, session.id);
    assert_eq!(found_user.id, user.id);

    // Unknown session ids resolve to nothing
    assert!(
        Session::find_active_with_user(&pool, Uuid::new_v4())
            .await
            .expect("Lookup failed")
            .is_none()
    );
}

#[tokio::test]
async fn test_expired_session_is_dead() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let user = create_test_user(&pool, "alice", "alice@example.com")
        .await
        .expect("Failed to create user");
    let session = Session::create(&pool, user.id, Uuid::new_v4())
        .await
        .expect("Failed to create session");

    sqlx::query("UPDATE sessions SET expires_at = datetime('now', '-1 day') WHERE id = $1")
        .bind(session.id)
        .execute(&pool)
        .await
        .expect("Failed to expire session");

    assert!(
        Session::find_active_with_user(&pool, session.id)
            .await
            .expect("Lookup failed")
            .is_none()
    );

    let swept = Session::delete_expired(&pool).await.expect("Sweep failed");
    assert_eq!(swept, 1);
}

#[tokio::test]
async fn test_logout_deletes_session() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let user = create_test_user(&pool, "alice", "alice@example.com")
        .await
        .expect("Failed to create user");
    let session = Session::create(&pool, user.id, Uuid::new_v4())
        .await
        .expect("Failed to create session");

    let rows = Session::delete(&pool, session.id)
        .await
        .expect("Delete failed");
    assert_eq!(rows, 1);
    assert!(
        Session::find_active_with_user(&pool, session.id)
            .await
            .expect("Lookup failed")
            .is_none()
    );
}

#[tokio::test]
async fn test_duplicate_accounts_rejected() {
    let (pool, _temp_dir) = setup_test_pool().await;
    create_test_user(&pool, "alice", "alice@example.com")
        .await
        .expect("Failed to create user");

    let err = create_test_user(&pool, "alice", "other@example.com")
        .await
        .expect_err("Duplicate username should fail");
    assert!(matches!(err, UserError::UsernameTaken));

    let err = create_test_user(&pool, "bob", "alice@example.com")
        .await
        .expect_err("Duplicate email should fail");
    assert!(matches!(err, UserError::EmailTaken));
}

#[tokio::test]
async fn test_find_by_email() {
    let (pool, _temp_dir) = setup_test_pool().await;
    let user = create_test_user(&pool, "alice", "alice@example.com")
        .await
        .expect("Failed to create user");

    let found = User::find_by_email(&pool, "alice@example.com")
        .await
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(found.id, user.id);

    assert!(
        User::find_by_email(&pool, "nobody@example.com")
            .await
            .expect("Lookup failed")
            .is_none()
    );
}
