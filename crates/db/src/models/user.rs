use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("Email is already registered")]
    EmailTaken,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub password_hash: String,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, safe to hand to the client.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateUser,
        user_id: Uuid,
    ) -> Result<Self, UserError> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, username, email, password_hash)
               VALUES ($1, $2, $3, $4)
               RETURNING id, username, email, password_hash, created_at, updated_at"#,
        )
        .bind(user_id)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .fetch_one(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                if db_err.message().contains("users.username") {
                    UserError::UsernameTaken
                } else {
                    UserError::EmailTaken
                }
            }
            _ => UserError::Database(e),
        })
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, password_hash, created_at, updated_at
               FROM users
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, password_hash, created_at, updated_at
               FROM users
               WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }
}
