//! Top-level facade crate for replaykit.
//!
//! Re-exports the core engine and the gateway library so users can depend on a single crate.

pub mod core {
    pub use replaykit_core::*;
}

pub mod gateway {
    pub use replaykit_gateway::*;
}
