use axum::response::{IntoResponse, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusResponse {
    message: String,
    service: &'static str,
    version: &'static str,
}

pub async fn get_system_status() -> impl IntoResponse {
    Json(StatusResponse {
        message: "Marketplace API Server is running".to_string(),
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
