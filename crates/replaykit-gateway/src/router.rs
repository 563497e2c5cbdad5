//! Axum router wiring.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, convert, ops};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.cfg().gateway.max_body_bytes;
    Router::new()
        .route("/to_single_python_request", post(convert::handlers::to_single_python_request))
        .route("/to_python_request", post(convert::handlers::to_python_request))
        .route("/to_pwn", post(convert::handlers::to_pwn))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
