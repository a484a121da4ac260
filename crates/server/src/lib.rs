use db::DBService;

pub mod auth;
pub mod error;
pub mod file_logging;
pub mod middleware;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    db: DBService,
}

impl AppState {
    pub async fn new() -> Result<Self, sqlx::Error> {
        let db = DBService::new().await?;
        Ok(AppState { db })
    }

    /// Wrap an existing database service. Used by tests.
    pub fn with_db(db: DBService) -> Self {
        AppState { db }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }
}
