use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{IntoMakeService, get},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{AppState, middleware::session_auth};

pub mod auth;
pub mod boards;
pub mod cards;
pub mod frontend;
pub mod health;
pub mod lists;

/// Build the application router.
///
/// `/login`, `/logout` and `/register` live at the root like the client
/// expects; the CRUD surface sits under `/api` behind the session
/// middleware; everything else falls through to the embedded client bundle.
pub fn app(state: AppState) -> Router {
    let protected_api = Router::new()
        .merge(boards::router(&state))
        .merge(lists::router(&state))
        .merge(cards::router(&state))
        .layer(from_fn_with_state(state.clone(), session_auth));

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .merge(protected_api);

    Router::new()
        .merge(auth::router())
        .nest("/api", api_routes)
        .route("/", get(frontend::serve_frontend_root))
        .route("/{*path}", get(frontend::serve_frontend))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn router(state: AppState) -> IntoMakeService<Router> {
    app(state).into_make_service()
}
