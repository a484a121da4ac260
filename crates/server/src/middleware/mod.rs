use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use db::models::{
    board::Board, card::Card, list::List, session::Session, user::User,
};
use uuid::Uuid;

use crate::{AppState, auth::SESSION_COOKIE};

/// Resolve the session cookie and stash the session and user in request
/// extensions. Requests without a live session get an empty 401.
pub async fn session_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let Ok(session_id) = Uuid::parse_str(cookie.value()) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    match Session::find_active_with_user(&state.db().pool, session_id).await {
        Ok(Some((session, user))) => {
            request.extensions_mut().insert(session);
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Ok(None) => Err(StatusCode::UNAUTHORIZED),
        Err(e) => {
            tracing::error!("Failed to resolve session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Load the board addressed by the `board_id` path param and make sure it
/// belongs to the session user. Boards of other users look like 404s.
pub async fn load_board_middleware(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    match Board::find_by_id(&state.db().pool, board_id).await {
        Ok(Some(board)) if board.user_id == user.id => {
            request.extensions_mut().insert(board);
            Ok(next.run(request).await)
        }
        Ok(_) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load board {}: {}", board_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn load_list_middleware(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    match List::find_by_id_for_user(&state.db().pool, list_id, user.id).await {
        Ok(Some(list)) => {
            request.extensions_mut().insert(list);
            Ok(next.run(request).await)
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load list {}: {}", list_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn load_card_middleware(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    match Card::find_by_id_for_user(&state.db().pool, card_id, user.id).await {
        Ok(Some(card)) => {
            request.extensions_mut().insert(card);
            Ok(next.run(request).await)
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load card {}: {}", card_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
