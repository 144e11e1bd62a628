use crate::model::Light;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateLightRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLightRequest {
    pub status: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub started_at: String,
}

/// Body shared by every write route and by all failures:
/// `{status, message}` plus the affected light when there is one.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct APIResponse {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<Light>,
}

impl APIResponse {
    pub fn ok(msg: &str) -> Self {
        APIResponse {
            status: true,
            message: msg.to_owned(),
            data: None,
        }
    }

    pub fn ok_with_light(msg: &str, light: Light) -> Self {
        APIResponse {
            status: true,
            message: msg.to_owned(),
            data: Some(light),
        }
    }

    pub fn rejected(msg: &str) -> Self {
        APIResponse {
            status: false,
            message: msg.to_owned(),
            data: None,
        }
    }
}
