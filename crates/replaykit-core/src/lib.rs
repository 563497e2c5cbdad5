//! replaykit core: turns captured flows into runnable replay scripts.
//!
//! The crate decodes raw client HTTP requests, tokenizes their bodies and
//! renders Python `requests` scripts, or renders whole flows as pwntools
//! raw-socket scripts. It performs no I/O and holds no state, so every
//! entry point can be called concurrently.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Captured traffic is
//! hostile input; all fallible paths surface as `ReplayError`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod flow;
pub mod http;
pub mod render;

pub use error::{ErrorKind, ReplayError, Result};
pub use flow::{Direction, Flow, Message};
pub use render::{
    render_flow_requests, render_raw_flow, render_raw_flow_with, render_single_request,
    RawScriptOptions, RequestOptions,
};
