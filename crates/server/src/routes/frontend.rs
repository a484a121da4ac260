use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// The pre-built client bundle, embedded at compile time.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../frontend/dist"]
struct ClientAssets;

pub async fn serve_frontend_root() -> Response {
    serve_asset("index.html")
}

/// Catch-all for client routes: serve the asset if one exists, otherwise
/// fall back to index.html and let the SPA router take over.
pub async fn serve_frontend(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');
    if ClientAssets::get(path).is_some() {
        serve_asset(path)
    } else {
        serve_asset("index.html")
    }
}

fn serve_asset(path: &str) -> Response {
    match ClientAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
