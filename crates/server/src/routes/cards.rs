use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{post, put},
};
use db::models::{
    card::{Card, CreateCard, UpdateCard},
    list::List,
    user::User,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_card_middleware};

/// POST /api/cards - Append a card to the end of a list.
pub async fn create_card(
    Extension(user): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<CreateCard>,
) -> Result<ResponseJson<ApiResponse<Card>>, ApiError> {
    let pool = &state.db().pool;

    List::find_by_id_for_user(pool, payload.list_id, user.id)
        .await?
        .ok_or(ApiError::NotFound("List"))?;

    let card = Card::create(pool, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(card)))
}

/// PUT /api/cards/{card_id} - Edit, toggle, and/or move a card. A move to a
/// different list reassigns the position indices on both sides.
pub async fn update_card(
    Extension(user): Extension<User>,
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateCard>,
) -> Result<ResponseJson<ApiResponse<Card>>, ApiError> {
    let pool = &state.db().pool;

    // A cross-list move may only target the user's own lists.
    if let Some(target_list_id) = payload.list_id
        && target_list_id != card.list_id
    {
        List::find_by_id_for_user(pool, target_list_id, user.id)
            .await?
            .ok_or(ApiError::NotFound("List"))?;
    }

    let updated = card.update(pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/cards/{card_id} - Delete a card; later siblings shift down.
pub async fn delete_card(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = card.delete(&state.db().pool).await?;
    if rows_affected == 0 {
        Err(ApiError::Database(sqlx::Error::RowNotFound))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

pub fn router(state: &AppState) -> Router<AppState> {
    let card_router = Router::new()
        .route("/", put(update_card).delete(delete_card))
        .layer(from_fn_with_state(state.clone(), load_card_middleware));

    let inner = Router::new()
        .route("/", post(create_card))
        .nest("/{card_id}", card_router);

    Router::new().nest("/cards", inner)
}
