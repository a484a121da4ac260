use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    board::{Board, BoardWithLists, CreateBoard, UpdateBoard},
    card::CardFilter,
    user::User,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_board_middleware};

/// GET /api/boards - All boards of the session user, lists and cards nested.
pub async fn get_boards(
    Extension(user): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<BoardWithLists>>>, ApiError> {
    let boards =
        Board::find_all_with_content(&state.db().pool, user.id, CardFilter::All).await?;
    Ok(ResponseJson(ApiResponse::success(boards)))
}

/// POST /api/boards - Create a new board.
pub async fn create_board(
    Extension(user): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<CreateBoard>,
) -> Result<ResponseJson<ApiResponse<Board>>, ApiError> {
    let board = Board::create(&state.db().pool, user.id, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(board)))
}

/// GET /api/boards/{board_id} - One board with its content.
pub async fn get_board(
    Extension(board): Extension<Board>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<BoardWithLists>>, ApiError> {
    let board = board.with_content(&state.db().pool, CardFilter::All).await?;
    Ok(ResponseJson(ApiResponse::success(board)))
}

/// PUT /api/boards/{board_id} - Rename a board.
pub async fn update_board(
    Extension(board): Extension<Board>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateBoard>,
) -> Result<ResponseJson<ApiResponse<Board>>, ApiError> {
    let title = payload.title.as_deref().unwrap_or(&board.title);
    let updated = Board::update(&state.db().pool, board.id, title).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/boards/{board_id} - Delete a board and everything on it.
pub async fn delete_board(
    Extension(board): Extension<Board>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Board::delete(&state.db().pool, board.id).await?;
    if rows_affected == 0 {
        Err(ApiError::Database(sqlx::Error::RowNotFound))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

pub fn router(state: &AppState) -> Router<AppState> {
    let board_router = Router::new()
        .route("/", get(get_board).put(update_board).delete(delete_board))
        .layer(from_fn_with_state(state.clone(), load_board_middleware));

    let inner = Router::new()
        .route("/", get(get_boards).post(create_board))
        .nest("/{board_id}", board_router);

    Router::new().nest("/boards", inner)
}
