//! Minimal HTTP/1.x request decoder (panic-free).
//!
//! Parsing rules:
//! - Head and body are split at the first `\r\n\r\n`; no separator means no body.
//! - Lines inside the head may end with `\r\n` or a bare `\n`.
//! - Header bytes are ISO-8859-1, so every byte maps to exactly one char.
//! - No header is filtered here; callers decide what to keep.

use bytes::Bytes;

use crate::error::{ReplayError, Result};

const HEAD_SEPARATOR: &[u8] = b"\r\n\r\n";
const MAX_HEADERS: usize = 100;

/// Ordered header list with case-insensitive lookup.
///
/// Keys keep their captured spelling. Repeating the exact same name keeps the
/// first value only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the exact name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if self.entries.iter().any(|(k, _)| *k == name) {
            return;
        }
        self.entries.push((name, value.into()));
    }

    /// First value whose name matches case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Keep only entries for which `keep(name)` holds.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|(k, _)| keep(k));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn last_value_mut(&mut self) -> Option<&mut String> {
        self.entries.last_mut().map(|(_, v)| v)
    }
}

/// A request exactly as captured: request line, raw headers and body.
#[derive(Debug, Clone)]
pub struct RawRequest {
    /// Method token as written on the wire (case preserved).
    pub method: String,
    /// Request target (not validated).
    pub path: String,
    pub headers: Headers,
    /// `None` when the head/body separator is absent.
    pub body: Option<Bytes>,
}

impl RawRequest {
    pub fn content_type(&self) -> &str {
        self.headers.get("content-type").unwrap_or("")
    }
}

/// Decode one raw client request.
pub fn decode_request(raw: Bytes) -> Result<RawRequest> {
    let (head, body) = match find(&raw, HEAD_SEPARATOR) {
        Some(pos) => {
            let body = raw.slice(pos + HEAD_SEPARATOR.len()..);
            (raw.slice(..pos), Some(trim_end(body)))
        }
        None => (raw.clone(), None),
    };

    let mut lines = head.split(|&b| b == b'\n').map(|l| l.strip_suffix(b"\r").unwrap_or(l));

    let request_line = latin1(lines.next().unwrap_or_default());
    let (method, path) = parse_request_line(&request_line)?;

    let mut headers = Headers::new();
    let mut count = 0usize;
    for line in lines {
        if line.is_empty() {
            break;
        }
        let line = latin1(line);

        if line.starts_with(&[' ', '\t'][..]) {
            let value = headers.last_value_mut().ok_or_else(|| {
                ReplayError::MalformedRequest("continuation line before any header".into())
            })?;
            value.push(' ');
            value.push_str(line.trim());
            continue;
        }

        count += 1;
        if count > MAX_HEADERS {
            return Err(ReplayError::MalformedRequest(format!(
                "got more than {MAX_HEADERS} headers"
            )));
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| {
                ReplayError::MalformedRequest(format!("malformed header line: {line:?}"))
            })?;
        if name.is_empty() || name.contains(|c: char| c.is_whitespace()) {
            return Err(ReplayError::MalformedRequest(format!(
                "malformed header name: {name:?}"
            )));
        }
        headers.insert(name, value.trim());
    }

    Ok(RawRequest {
        method,
        path,
        headers,
        body,
    })
}

/// Split and check the request line; the version is validated but not kept.
fn parse_request_line(line: &str) -> Result<(String, String)> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Err(ReplayError::MalformedRequest("missing method in request line".into())),
        [_] => Err(ReplayError::MalformedRequest(format!(
            "missing path in request line: {line:?}"
        ))),
        [_, _] => Err(ReplayError::MalformedRequest(format!(
            "missing HTTP version in request line: {line:?}"
        ))),
        [method, path, version] => {
            if !is_valid_version(version) {
                return Err(ReplayError::MalformedRequest(format!(
                    "bad request version: {version:?}"
                )));
            }
            Ok((method.to_string(), path.to_string()))
        }
        _ => Err(ReplayError::MalformedRequest(format!("bad request syntax: {line:?}"))),
    }
}

fn is_valid_version(version: &str) -> bool {
    let Some(number) = version.strip_prefix("HTTP/") else {
        return false;
    };
    let Some((major, minor)) = number.split_once('.') else {
        return false;
    };
    [major, minor]
        .iter()
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn trim_end(body: Bytes) -> Bytes {
    let end = body
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    body.slice(..end)
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
