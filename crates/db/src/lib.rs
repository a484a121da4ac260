use std::{path::Path, str::FromStr, time::Duration};

use sqlx::{
    Error, Executor, Pool, Sqlite,
    sqlite::{
        SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions,
        SqliteSynchronous,
    },
};
use utils::assets::database_path;

pub mod models;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Default maximum connections in the pool.
/// SQLite benefits from limited connections due to single-writer model.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Minimum idle connections to maintain.
const DEFAULT_MIN_CONNECTIONS: u32 = 2;

/// Connection acquisition timeout in seconds.
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Idle connection timeout in seconds (10 minutes).
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

fn get_max_connections() -> u32 {
    std::env::var("CORKBOARD_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&n| n > 0 && n <= 100)
        .unwrap_or(DEFAULT_MAX_CONNECTIONS)
}

/// Apply performance pragmas on every new connection via `after_connect`.
///
/// `synchronous` must be set AFTER `mmap_size`: enabling mmap can affect how
/// SQLite handles fsync, and without an explicit synchronous setting disk
/// I/O errors can occur under write load.
async fn apply_performance_pragmas(conn: &mut SqliteConnection) -> Result<(), Error> {
    // temp_store = MEMORY (2)
    conn.execute("PRAGMA temp_store = 2").await?;

    #[cfg(debug_assertions)]
    conn.execute("PRAGMA mmap_size = 67108864").await?; // 64MB

    #[cfg(not(debug_assertions))]
    conn.execute("PRAGMA mmap_size = 268435456").await?; // 256MB

    conn.execute("PRAGMA synchronous = NORMAL").await?;

    // 64MB page cache (negative = KB)
    conn.execute("PRAGMA cache_size = -64000").await?;

    Ok(())
}

#[derive(Clone)]
pub struct DBService {
    pub pool: Pool<Sqlite>,
}

impl DBService {
    /// Open (creating if missing) the database at the default location and
    /// run pending migrations.
    pub async fn new() -> Result<DBService, Error> {
        Self::new_at(&database_path()).await
    }

    /// Open the database at an explicit path. Used directly by tests.
    pub async fn new_at(db_path: &Path) -> Result<DBService, Error> {
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());
        let max_connections = get_max_connections();

        tracing::info!(
            max_connections = max_connections,
            min_connections = DEFAULT_MIN_CONNECTIONS,
            "Initializing SQLite connection pool"
        );

        let options = SqliteConnectOptions::from_str(&database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(DEFAULT_MIN_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Some(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS)))
            .after_connect(|conn, _meta| {
                Box::pin(async move { apply_performance_pragmas(conn).await })
            })
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::Migrate(Box::new(e)))?;

        Ok(DBService { pool })
    }

    /// Wrap an existing pool. Used by tests that build their own pool.
    pub fn from_pool(pool: Pool<Sqlite>) -> DBService {
        DBService { pool }
    }
}
