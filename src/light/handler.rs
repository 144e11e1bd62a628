use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};

use crate::api::{APIResponse, CountResponse, CreateLightRequest, UpdateLightRequest};
use crate::error::RegistryError;
use crate::handler::AppState;
use crate::model::{CreateOutcome, DeleteOutcome};
use crate::{bad_request, good_response, server_error, unpack_error};

pub const CREATED_MESSAGE: &str = "You successfully created new light.";
pub const CAPACITY_MESSAGE: &str = "You already created max light.";
pub const DELETED_MESSAGE: &str = "Successfully deleted";
pub const NOTHING_TO_DELETE_MESSAGE: &str = "No lights to delete";

fn registry_failure(op: &str, err: RegistryError) -> Response {
    let message = unpack_error(&err);
    if err.is_validation() {
        tracing::info!(op, error = %message, "rejected invalid request");
        return bad_request(APIResponse::rejected(&message));
    }
    tracing::error!(op, error = %message, "light registry call failed");
    server_error(APIResponse::rejected(&message))
}

/// Unreadable bodies are infrastructure failures, unlike a readable body with
/// an invalid `name`.
fn malformed_body(op: &str, rejection: JsonRejection) -> Response {
    tracing::error!(op, error = %rejection.body_text(), "malformed request body");
    server_error(APIResponse::rejected(&rejection.body_text()))
}

pub async fn light_count(State(state): State<AppState>) -> Response {
    match state.registry.count().await {
        Ok(count) => Json(CountResponse { count }).into_response(),
        Err(e) => registry_failure("count", e),
    }
}

pub async fn list_lights(State(state): State<AppState>) -> Response {
    match state.registry.list().await {
        Ok(lights) => Json(lights).into_response(),
        Err(e) => registry_failure("list", e),
    }
}

/// Renders `null` when no light sits at the index.
pub async fn get_light(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.registry.get(&id).await {
        Ok(light) => Json(light).into_response(),
        Err(e) => registry_failure("get", e),
    }
}

pub async fn create_light(
    State(state): State<AppState>,
    payload: Result<Json<CreateLightRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return malformed_body("create", rejection),
    };

    match state.registry.create(&payload.name).await {
        Ok(CreateOutcome::Created(light)) => good_response(APIResponse::ok_with_light(CREATED_MESSAGE, light)),
        Ok(CreateOutcome::CapacityReached) => good_response(APIResponse::rejected(CAPACITY_MESSAGE)),
        Err(e) => registry_failure("create", e),
    }
}

/// Renders the updated light, or `null` when no light sits at the index.
pub async fn update_light(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLightRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return malformed_body("update", rejection),
    };

    match state.registry.update(&id, payload.status).await {
        Ok(light) => Json(light).into_response(),
        Err(e) => registry_failure("update", e),
    }
}

pub async fn delete_light(State(state): State<AppState>) -> Response {
    match state.registry.delete().await {
        Ok(DeleteOutcome::Deleted(_)) => good_response(APIResponse::ok(DELETED_MESSAGE)),
        Ok(DeleteOutcome::Empty) => good_response(APIResponse::rejected(NOTHING_TO_DELETE_MESSAGE)),
        Err(e) => registry_failure("delete", e),
    }
}
