use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Status, declared model and whether a credential is configured. Never echoes the key.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "model": state.gateway.model(),
        "api_key_configured": !state.config.gemini_api_key.is_empty(),
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    }))
}

/// GET /
/// Service descriptor with the endpoint list.
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "MuseCareer CV Analysis API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "analyze_cv_file": "/analyze-cv (POST)",
            "analyze_cv_text": "/analyze-cv-text (POST)",
            "analyze_cv_base64": "/analyze-cv-base64 (POST)"
        }
    }))
}
