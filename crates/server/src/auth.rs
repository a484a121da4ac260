use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use db::models::{session::Session, user::User};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Name of the cookie carrying the opaque session id.
pub const SESSION_COOKIE: &str = "corkboard_session";

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

/// Build the session cookie. HttpOnly keeps it away from client scripts,
/// SameSite=Lax covers the SPA's fetch calls. Expiry lives server-side.
pub fn session_cookie(session_id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Remove the session cookie from the jar.
pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
}

/// Resolve the session cookie to a live session and its user.
///
/// Used by the root-level routes (`GET /login`, `DELETE /logout`) that sit
/// outside the `/api` session middleware.
pub async fn require_user(
    state: &AppState,
    jar: &CookieJar,
) -> Result<(Session, User), ApiError> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;
    let session_id = Uuid::parse_str(cookie.value()).map_err(|_| ApiError::Unauthorized)?;

    Session::find_active_with_user(&state.db().pool, session_id)
        .await?
        .ok_or(ApiError::Unauthorized)
}
