// handlers/public/home.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::server::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Connected Office API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Office device inventory and access control",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "security": "/api/security/* (login and registration public, the rest signed in)",
            "categories": "/api/categories/* (Admin)",
            "devices": "/api/devices/* (Admin)",
            "zones": "/api/zones/* (Admin)"
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
