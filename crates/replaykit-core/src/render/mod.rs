//! Script renderers.
//!
//! - `requests`: Python `requests` scripts, one request or a whole flow.
//! - `pwn`: pwntools raw-socket scripts replaying both directions.
//!
//! Every renderer is a pure function of its inputs: identical flows and
//! options always produce byte-identical text.

pub mod escape;
pub mod pwn;
pub mod pyrepr;
pub mod requests;
pub mod script;

pub use escape::{escape_bytes, unescape_bytes};
pub use pwn::{render_raw_flow, render_raw_flow_with, RawScriptOptions, SYNC_SUFFIX_LEN};
pub use pyrepr::PyLiteral;
pub use requests::{render_flow_requests, render_single_request, RequestOptions};
