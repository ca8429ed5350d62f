use axum::{extract::OriginalUri, http::StatusCode, Json};
use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "service is running",
        version: VERSION,
    })
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "welcome to the usergate API",
        version: VERSION,
    })
}

#[derive(Debug, Serialize)]
pub struct RouteNotFound {
    pub error: &'static str,
    pub message: &'static str,
    pub path: String,
}

pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<RouteNotFound>) {
    (
        StatusCode::NOT_FOUND,
        Json(RouteNotFound {
            error: "route not found",
            message: "the requested route does not exist",
            path: uri.path().to_string(),
        }),
    )
}
