use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    error::ErrorData,
    response::ApiResponse,
    state::AppState,
};

pub mod checkout;
pub mod doc;
pub mod extract;
pub mod health;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new().nest("/checkout", checkout::router())
}

/// Full application router with state bound. Transport layers are added by
/// the binary.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<ErrorData>>) {
    let body = ApiResponse::error(
        "Not Found",
        ErrorData {
            kind: "not_found".to_string(),
            error: format!("no route for {}", uri.path()),
        },
    );
    (StatusCode::NOT_FOUND, Json(body))
}
