//! Decode → filter → validate → tokenize, shared by both HTTP renderers.

use bytes::Bytes;

use crate::error::{ReplayError, Result};
use crate::flow::Message;

use super::body::{tokenize_body, BodyValue, ParamName};
use super::decoder::{decode_request, Headers};
use super::method::Method;

/// Headers the replaying client regenerates on its own.
pub const TRANSPORT_HEADERS: [&str; 5] =
    ["content-length", "accept-encoding", "connection", "accept", "host"];

/// A client request ready to be rendered.
#[derive(Debug, Clone)]
pub struct DecodedRequest {
    pub method: Method,
    pub path: String,
    /// Captured headers minus [`TRANSPORT_HEADERS`].
    pub headers: Headers,
    pub body: BodyValue,
    pub param: ParamName,
}

impl DecodedRequest {
    /// Build from a flow message; only client messages are HTTP requests.
    pub fn from_message(msg: &Message, tokenize: bool) -> Result<Self> {
        if !msg.is_client() {
            return Err(ReplayError::MalformedFlow(
                "server messages cannot be decoded as HTTP requests".into(),
            ));
        }
        Self::from_bytes(Bytes::copy_from_slice(msg.text_bytes()?), tokenize)
    }

    /// Build from a raw client request buffer.
    pub fn from_bytes(raw: Bytes, tokenize: bool) -> Result<Self> {
        let raw = decode_request(raw)?;
        let content_type = raw.content_type().to_string();

        let mut headers = raw.headers;
        headers.retain(|name| !is_transport_header(name));

        let method = Method::parse(&raw.method)?;
        if !raw.path.starts_with('/') {
            return Err(ReplayError::InvalidPath(raw.path));
        }

        let body = tokenize_body(&content_type, raw.body, tokenize)?;

        Ok(Self {
            method,
            path: raw.path,
            headers,
            body: body.value,
            param: body.param,
        })
    }
}

pub fn is_transport_header(name: &str) -> bool {
    TRANSPORT_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn transport_headers_are_dropped_case_insensitively() {
        let req = DecodedRequest::from_bytes(
            Bytes::from_static(
                b"GET /ping HTTP/1.1\r\nHost: x\r\nACCEPT: */*\r\nConnection: close\r\n\
                  Accept-Encoding: gzip\r\nContent-Length: 0\r\nUser-Agent: t\r\n\r\n",
            ),
            true,
        )
        .unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/ping");
        assert_eq!(req.headers.iter().collect::<Vec<_>>(), vec![("User-Agent", "t")]);
        assert_eq!(req.body, BodyValue::Bytes(Bytes::new()));
    }

    #[test]
    fn path_without_slash_is_invalid() {
        let raw = Bytes::from_static(b"GET ping HTTP/1.1\r\nHost: x\r\n\r\n");
        let err = DecodedRequest::from_bytes(raw, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }

    #[test]
    fn method_is_validated_before_path() {
        let raw = Bytes::from_static(b"FETCH ping HTTP/1.1\r\n\r\n");
        let err = DecodedRequest::from_bytes(raw, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMethod);
    }

    #[test]
    fn server_messages_are_rejected() {
        let msg = Message::server_text("GET / HTTP/1.1\r\n\r\n");
        let err = DecodedRequest::from_message(&msg, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedFlow);
    }

    #[test]
    fn content_type_survives_for_tokenizing() {
        let msg = Message::client_text(
            "POST /api HTTP/1.1\r\ncontent-type: application/json\r\n\r\n[1, true]",
        );
        let req = DecodedRequest::from_message(&msg, true).unwrap();
        assert_eq!(req.param, ParamName::Json);
        assert_eq!(req.body, BodyValue::Json(serde_json::json!([1, true])));
        assert_eq!(req.headers.get("Content-Type"), Some("application/json"));
    }
}
