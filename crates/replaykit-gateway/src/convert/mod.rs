//! Conversion service: request bodies in, generated scripts out.
//!
//! Every conversion runs through [`observe`], which records metrics and logs
//! the outcome. The core renderers stay silent; logging happens here.

pub mod handlers;

use std::time::Instant;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use replaykit_core::{
    render_flow_requests, render_raw_flow_with, render_single_request, Flow, RequestOptions,
};

use crate::app_state::AppState;
use crate::error::{GatewayError, Result};

/// Which script flavour a conversion produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    SingleRequest,
    FlowRequests,
    RawSocket,
}

impl ConversionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConversionKind::SingleRequest => "single_request",
            ConversionKind::FlowRequests => "flow_requests",
            ConversionKind::RawSocket => "raw_socket",
        }
    }
}

/// Query switches; unset values fall back to the configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertQuery {
    pub tokenize: Option<String>,
    pub use_requests_session: Option<String>,
}

impl ConvertQuery {
    pub fn options(&self, defaults: RequestOptions) -> Result<RequestOptions> {
        Ok(RequestOptions {
            tokenize: parse_flag("tokenize", self.tokenize.as_deref(), defaults.tokenize)?,
            use_session: parse_flag(
                "use_requests_session",
                self.use_requests_session.as_deref(),
                defaults.use_session,
            )?,
        })
    }
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off` (any case).
pub fn parse_flag(name: &str, value: Option<&str>, default: bool) -> Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        "" => Ok(default),
        other => Err(GatewayError::BadInput(format!("invalid value for {name}: {other:?}"))),
    }
}

/// Body of `POST /to_single_python_request`.
#[derive(Debug, Deserialize)]
pub struct SingleRequestBody {
    /// Owning flow (only `dst_port` is used).
    pub flow: Flow,
    /// The (possibly edited) raw request, base64-encoded.
    pub request: String,
}

pub fn convert_single(state: &AppState, query: &ConvertQuery, body: &[u8]) -> Result<String> {
    observe(state, ConversionKind::SingleRequest, || {
        let opts = query.options(state.cfg().conversion.single_options())?;
        let body: SingleRequestBody = serde_json::from_slice(body)
            .map_err(|e| GatewayError::BadInput(format!("invalid request body: {e}")))?;
        let raw = STANDARD
            .decode(body.request.trim())
            .map_err(|e| GatewayError::BadInput(format!("request is not valid base64: {e}")))?;
        Ok(render_single_request(&raw, &body.flow, opts)?)
    })
}

pub fn convert_flow(state: &AppState, query: &ConvertQuery, body: &[u8]) -> Result<String> {
    observe(state, ConversionKind::FlowRequests, || {
        let opts = query.options(state.cfg().conversion.flow_options())?;
        let flow = Flow::from_slice(body)?;
        Ok(render_flow_requests(&flow, opts)?)
    })
}

pub fn convert_raw(state: &AppState, body: &[u8]) -> Result<String> {
    let opts = state.cfg().conversion.raw_options();
    observe(state, ConversionKind::RawSocket, || {
        let flow = Flow::from_slice(body)?;
        Ok(render_raw_flow_with(&flow, opts)?)
    })
}

fn observe(
    state: &AppState,
    kind: ConversionKind,
    convert: impl FnOnce() -> Result<String>,
) -> Result<String> {
    let metrics = state.metrics();
    let labels = [("kind", kind.as_str())];

    metrics.conversions_in_flight.inc(&labels);
    let started = Instant::now();
    let res = convert();
    let elapsed = started.elapsed();
    metrics.conversions_in_flight.dec(&labels);
    metrics.conversion_duration.observe(&labels, elapsed);

    match &res {
        Ok(script) => {
            metrics.conversions.inc(&[("kind", kind.as_str()), ("outcome", "ok")]);
            tracing::debug!(
                kind = kind.as_str(),
                bytes = script.len(),
                micros = elapsed.as_micros() as u64,
                "conversion done"
            );
        }
        Err(e) => {
            metrics.conversions.inc(&[("kind", kind.as_str()), ("outcome", "error")]);
            metrics.conversion_errors.inc(&[("kind", kind.as_str()), ("error", e.label())]);
            tracing::warn!(kind = kind.as_str(), error = %e, "conversion failed");
        }
    }
    res
}
