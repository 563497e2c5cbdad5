//! Error surface of the decoding and rendering engine.

use thiserror::Error;

/// Stable error kinds (used by callers to build diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Method token outside the supported set.
    InvalidMethod,
    /// Request line or header block does not parse as HTTP.
    MalformedRequest,
    /// Decoded path does not start with `/`.
    InvalidPath,
    /// Body kind that cannot be tokenized (multipart).
    UnsupportedBody,
    /// Form or JSON body that fails to parse.
    MalformedBody,
    /// Flow-level field missing or undecodable.
    MalformedFlow,
    /// A message inside a flow failed to render.
    FlowRenderFailed,
}

impl ErrorKind {
    /// Machine-readable code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidMethod => "INVALID_METHOD",
            ErrorKind::MalformedRequest => "MALFORMED_REQUEST",
            ErrorKind::InvalidPath => "INVALID_PATH",
            ErrorKind::UnsupportedBody => "UNSUPPORTED_BODY",
            ErrorKind::MalformedBody => "MALFORMED_BODY",
            ErrorKind::MalformedFlow => "MALFORMED_FLOW",
            ErrorKind::FlowRenderFailed => "FLOW_RENDER_FAILED",
        }
    }

    /// Human-readable name used in text diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::InvalidMethod => "InvalidMethod",
            ErrorKind::MalformedRequest => "MalformedRequest",
            ErrorKind::InvalidPath => "InvalidPath",
            ErrorKind::UnsupportedBody => "UnsupportedBody",
            ErrorKind::MalformedBody => "MalformedBody",
            ErrorKind::MalformedFlow => "MalformedFlow",
            ErrorKind::FlowRenderFailed => "FlowRenderFailed",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReplayError>;

/// Unified error type returned by every core operation.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("invalid request method: {0}")]
    InvalidMethod(String),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("request path must start with / to be a valid HTTP request: {0:?}")]
    InvalidPath(String),
    #[error("unsupported body: {0}")]
    UnsupportedBody(String),
    #[error("malformed body: {0}")]
    MalformedBody(String),
    #[error("malformed flow: {0}")]
    MalformedFlow(String),
    #[error("message #{index} could not be rendered: {source}")]
    FlowRenderFailed {
        /// Position of the offending message in the flow.
        index: usize,
        #[source]
        source: Box<ReplayError>,
    },
}

impl ReplayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReplayError::InvalidMethod(_) => ErrorKind::InvalidMethod,
            ReplayError::MalformedRequest(_) => ErrorKind::MalformedRequest,
            ReplayError::InvalidPath(_) => ErrorKind::InvalidPath,
            ReplayError::UnsupportedBody(_) => ErrorKind::UnsupportedBody,
            ReplayError::MalformedBody(_) => ErrorKind::MalformedBody,
            ReplayError::MalformedFlow(_) => ErrorKind::MalformedFlow,
            ReplayError::FlowRenderFailed { .. } => ErrorKind::FlowRenderFailed,
        }
    }

    /// Innermost per-message error (unwraps `FlowRenderFailed`).
    pub fn root(&self) -> &ReplayError {
        match self {
            ReplayError::FlowRenderFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Prefix a flow-level failure with the message position.
    pub(crate) fn in_message(self, index: usize) -> Self {
        match self {
            ReplayError::MalformedFlow(msg) => {
                ReplayError::MalformedFlow(format!("message #{index}: {msg}"))
            }
            other => other,
        }
    }

    pub(crate) fn at_message(self, index: usize) -> Self {
        ReplayError::FlowRenderFailed {
            index,
            source: Box::new(self),
        }
    }
}
