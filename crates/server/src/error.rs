use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::user::UserError;
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    PasswordHash(#[from] bcrypt::BcryptError),
    #[error("Invalid or missing session")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Failed auth answers with an empty body, everything else with the
        // standard envelope.
        let status = match &self {
            ApiError::Unauthorized => return StatusCode::UNAUTHORIZED.into_response(),
            ApiError::NotFound(_) | ApiError::Database(sqlx::Error::RowNotFound) => {
                StatusCode::NOT_FOUND
            }
            ApiError::User(UserError::UsernameTaken | UserError::EmailTaken) => {
                StatusCode::CONFLICT
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) | ApiError::User(UserError::Database(_))
            | ApiError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("API error: {}", self);
        }

        let message = self.to_string();
        (status, Json(ApiResponse::<()>::error(&message))).into_response()
    }
}
