use axum::{
    Json, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use axum_extra::extract::cookie::CookieJar;
use db::models::{
    board::{Board, BoardWithLists},
    card::CardFilter,
    session::Session,
    user::{CreateUser, User, UserSummary},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth, error::ApiError};

#[derive(Debug, Deserialize, TS)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, TS)]
pub struct LoginResponse {
    pub user: UserSummary,
    pub boards: Vec<BoardWithLists>,
}

/// POST /register - Create an account and open a session.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<LoginResponse>>), ApiError> {
    if payload.username.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Username and email are required".to_string(),
        ));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let data = CreateUser {
        username: payload.username,
        email: payload.email,
        password_hash,
    };
    let user = User::create(&state.db().pool, &data, Uuid::new_v4()).await?;

    tracing::info!("Registered new user {}", user.username);

    let session = Session::create(&state.db().pool, user.id, Uuid::new_v4()).await?;
    let jar = jar.add(auth::session_cookie(session.id));

    Ok((
        jar,
        ResponseJson(ApiResponse::success(LoginResponse {
            user: UserSummary::from(&user),
            boards: Vec::new(),
        })),
    ))
}

/// POST /login - Verify credentials, open a session, and return the user's
/// boards. Only incomplete cards are nested here; the status endpoint below
/// returns everything.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<LoginResponse>>), ApiError> {
    let pool = &state.db().pool;

    let user = User::find_by_email(pool, &payload.email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !auth::verify_password(&payload.password, &user.password_hash)? {
        tracing::debug!("Failed login attempt for {}", payload.email);
        return Err(ApiError::Unauthorized);
    }

    let session = Session::create(pool, user.id, Uuid::new_v4()).await?;
    let boards = Board::find_all_with_content(pool, user.id, CardFilter::IncompleteOnly).await?;
    let jar = jar.add(auth::session_cookie(session.id));

    Ok((
        jar,
        ResponseJson(ApiResponse::success(LoginResponse {
            user: UserSummary::from(&user),
            boards,
        })),
    ))
}

/// GET /login - Session probe: return the logged-in user and their boards
/// with all cards.
pub async fn login_status(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<ResponseJson<ApiResponse<LoginResponse>>, ApiError> {
    let (_session, user) = auth::require_user(&state, &jar).await?;

    let boards =
        Board::find_all_with_content(&state.db().pool, user.id, CardFilter::All).await?;

    Ok(ResponseJson(ApiResponse::success(LoginResponse {
        user: UserSummary::from(&user),
        boards,
    })))
}

/// DELETE /logout - Destroy the server-side session and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ResponseJson<ApiResponse<()>>), ApiError> {
    let (session, _user) = auth::require_user(&state, &jar).await?;

    Session::delete(&state.db().pool, session.id).await?;
    let jar = auth::clear_session_cookie(jar);

    Ok((jar, ResponseJson(ApiResponse::success(()))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", get(login_status).post(login))
        .route("/logout", delete(logout))
}
