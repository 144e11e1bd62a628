use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::api::{APIResponse, HealthResponse};
use crate::light::LightRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LightRegistry>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(registry: Arc<LightRegistry>) -> Self {
        AppState {
            registry,
            started_at: Utc::now(),
        }
    }
}

pub async fn welcome() -> &'static str {
    "Welcome to lamplighter."
}

pub async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    info!("got healthcheck request");
    Json(HealthResponse {
        status: "ok".to_owned(),
        started_at: state.started_at.to_rfc3339(),
    })
}

pub async fn api_probe() -> impl IntoResponse {
    Json(APIResponse::ok("You are authorized to access this endpoint."))
}
