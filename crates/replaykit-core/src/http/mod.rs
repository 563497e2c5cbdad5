//! HTTP request handling for the `requests` renderers.
//!
//! - `decoder`: request line + header block parser, body split.
//! - `method`: method normalisation against the supported set.
//! - `body`: content-type driven tokenization.
//! - `request`: the full pipeline producing a renderable [`DecodedRequest`].

pub mod body;
pub mod decoder;
pub mod method;
pub mod request;

pub use body::{tokenize_body, BodyKind, BodyValue, FormValue, ParamName, TokenizedBody};
pub use decoder::{decode_request, Headers, RawRequest};
pub use method::Method;
pub use request::DecodedRequest;
