use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{post, put},
};
use db::models::{
    board::Board,
    list::{CreateList, List, UpdateList},
    user::User,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_list_middleware};

/// POST /api/lists - Append a list to the end of a board.
pub async fn create_list(
    Extension(user): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<CreateList>,
) -> Result<ResponseJson<ApiResponse<List>>, ApiError> {
    let pool = &state.db().pool;

    // The target board must belong to the session user.
    let board = Board::find_by_id(pool, payload.board_id)
        .await?
        .filter(|b| b.user_id == user.id)
        .ok_or(ApiError::NotFound("Board"))?;

    let list = List::create(pool, &payload, Uuid::new_v4()).await?;
    tracing::debug!("Created list {} on board {}", list.id, board.id);
    Ok(ResponseJson(ApiResponse::success(list)))
}

/// PUT /api/lists/{list_id} - Rename and/or move a list within its board.
pub async fn update_list(
    Extension(list): Extension<List>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateList>,
) -> Result<ResponseJson<ApiResponse<List>>, ApiError> {
    let updated = list.update(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/lists/{list_id} - Delete a list; later siblings shift down.
pub async fn delete_list(
    Extension(list): Extension<List>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = list.delete(&state.db().pool).await?;
    if rows_affected == 0 {
        Err(ApiError::Database(sqlx::Error::RowNotFound))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

pub fn router(state: &AppState) -> Router<AppState> {
    let list_router = Router::new()
        .route("/", put(update_list).delete(delete_list))
        .layer(from_fn_with_state(state.clone(), load_list_middleware));

    let inner = Router::new()
        .route("/", post(create_list))
        .nest("/{list_id}", list_router);

    Router::new().nest("/lists", inner)
}
