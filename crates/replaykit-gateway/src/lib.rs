//! replaykit gateway library entry.
//!
//! Wires the conversion service, config loader and metrics into an axum
//! application. Flows are supplied by the caller in the request body; the
//! gateway never touches flow storage.

pub mod app_state;
pub mod config;
pub mod convert;
pub mod error;
pub mod obs;
pub mod ops;
pub mod router;

pub use error::{GatewayError, Result};
