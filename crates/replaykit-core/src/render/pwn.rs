//! Raw-socket replay scripts (pwntools).
//!
//! Client messages are written back verbatim. Server messages become
//! synchronisation points: the script blocks until the tail of the original
//! response shows up again.

use crate::error::Result;
use crate::flow::{Direction, Flow};

use super::escape::escape_bytes;
use super::script::{ScriptWriter, TargetHost};

/// Default number of trailing server bytes to wait for.
pub const SYNC_SUFFIX_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawScriptOptions {
    /// How many trailing bytes of each server message to wait for.
    /// Values below 1 are treated as 1.
    pub sync_suffix_len: usize,
}

impl Default for RawScriptOptions {
    fn default() -> Self {
        Self {
            sync_suffix_len: SYNC_SUFFIX_LEN,
        }
    }
}

/// Render `flow` with the default suffix length.
pub fn render_raw_flow(flow: &Flow) -> Result<String> {
    render_raw_flow_with(flow, RawScriptOptions::default())
}

pub fn render_raw_flow_with(flow: &Flow, opts: RawScriptOptions) -> Result<String> {
    let port = flow.port()?;
    let suffix_len = opts.sync_suffix_len.max(1);

    let mut w = ScriptWriter::new();
    w.line("from pwn import *").line("import os, sys").blank();
    w.line(TargetHost::EnvOrArg.statement());
    w.line(format!("proc = remote(host, {port})"));

    for (index, msg) in flow.messages.iter().enumerate() {
        let data = msg.raw_bytes().map_err(|e| e.in_message(index))?;
        match msg.from {
            Direction::Client => {
                w.line(format!("proc.write(b\"{}\")", escape_bytes(&data)));
            }
            Direction::Server => {
                if data.is_empty() {
                    continue;
                }
                let tail = &data[data.len().saturating_sub(suffix_len)..];
                w.line(format!("proc.recvuntil(b\"{}\")", sync_pattern(tail)));
            }
        }
    }

    Ok(w.finish())
}

/// Escaped suffix with every two-character `\n` sequence doubled to `\\n`.
fn sync_pattern(tail: &[u8]) -> String {
    escape_bytes(tail).replace("\\n", "\\\\n")
}
