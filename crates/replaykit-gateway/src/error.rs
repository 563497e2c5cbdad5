//! Gateway error surface and its text rendering.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use replaykit_core::ReplayError;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid config: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    BadInput(String),

    #[error(transparent)]
    Convert(#[from] ReplayError),
}

impl GatewayError {
    /// Short label shown in front of the diagnostic (`InvalidPath`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            GatewayError::Config(_) => "Config",
            GatewayError::Io(_) => "Io",
            GatewayError::BadInput(_) => "BadInput",
            GatewayError::Convert(e) => e.kind().name(),
        }
    }

    /// Text body returned to the caller.
    pub fn diagnostic(&self) -> String {
        format!("There was an error while converting the request:\n{}: {}", self.label(), self)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match self {
            GatewayError::BadInput(_) | GatewayError::Convert(_) => StatusCode::BAD_REQUEST,
            GatewayError::Config(_) | GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.diagnostic(),
        )
            .into_response()
    }
}
