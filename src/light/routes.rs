use axum::{
    Router,
    routing::{get, post},
};

use super::handler;
use crate::handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lightcount", get(handler::light_count))
        .route("/lights", get(handler::list_lights))
        .route("/getlight/:id", get(handler::get_light))
        .route("/createlight", post(handler::create_light))
        .route("/updatelight/:id", post(handler::update_light))
        .route("/deletelight", post(handler::delete_light))
}
