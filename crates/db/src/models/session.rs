use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::models::user::User;

/// Server-side login state. The client only ever holds the opaque `id`,
/// handed out in a cookie.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// How long a session stays valid after login.
pub const SESSION_TTL_DAYS: i64 = 7;

impl Session {
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);
        sqlx::query_as::<_, Session>(
            r#"INSERT INTO sessions (id, user_id, expires_at)
               VALUES ($1, $2, $3)
               RETURNING id, user_id, created_at, expires_at"#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// Resolve a live session together with its user. Expired or unknown
    /// sessions yield `None`.
    pub async fn find_active_with_user(
        pool: &SqlitePool,
        session_id: Uuid,
    ) -> Result<Option<(Session, User)>, sqlx::Error> {
        let now = Utc::now();
        let session = sqlx::query_as::<_, Session>(
            r#"SELECT id, user_id, created_at, expires_at
               FROM sessions
               WHERE id = $1 AND expires_at > $2"#,
        )
        .bind(session_id)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        let Some(session) = session else {
            return Ok(None);
        };

        let user = User::find_by_id(pool, session.user_id).await?;
        Ok(user.map(|u| (session, u)))
    }

    pub async fn delete(pool: &SqlitePool, session_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Drop every expired session. Run periodically from the server.
    pub async fn delete_expired(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let now = Utc::now();
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
