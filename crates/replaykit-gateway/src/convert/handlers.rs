//! Axum handlers for the conversion routes.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::app_state::AppState;
use crate::error::Result;

use super::{convert_flow, convert_raw, convert_single, ConvertQuery};

fn text(script: String) -> Response {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], script).into_response()
}

/// `POST /to_single_python_request`: JSON `{ "flow": ..., "request": "<base64>" }`.
pub async fn to_single_python_request(
    State(state): State<AppState>,
    Query(query): Query<ConvertQuery>,
    body: Bytes,
) -> Result<Response> {
    convert_single(&state, &query, &body).map(text)
}

/// `POST /to_python_request`: JSON flow.
pub async fn to_python_request(
    State(state): State<AppState>,
    Query(query): Query<ConvertQuery>,
    body: Bytes,
) -> Result<Response> {
    convert_flow(&state, &query, &body).map(text)
}

/// `POST /to_pwn`: JSON flow.
pub async fn to_pwn(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    convert_raw(&state, &body).map(text)
}
