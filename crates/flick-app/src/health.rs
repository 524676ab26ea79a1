use axum::{extract::State, response::IntoResponse, Json};
use flick_types::general::Environment;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct SystemInfo {
    status: &'static str,
    environment: Environment,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    system_info: SystemInfo,
}

pub async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    Json(Health {
        status: "available",
        system_info: SystemInfo {
            status: "available",
            environment: state.config().environment,
            version: env!("CARGO_PKG_VERSION"),
        },
    })
}
