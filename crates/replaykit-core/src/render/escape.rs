//! Byte escaping for double-quoted Python bytes literals (`b"..."`).

use std::fmt::Write;

/// Escape one byte: printable ASCII stays, `\` and `"` get a backslash,
/// everything else becomes lowercase `\xNN`.
pub fn escape_byte(b: u8, out: &mut String) {
    match b {
        b'\\' | b'"' => {
            out.push('\\');
            out.push(char::from(b));
        }
        0x20..=0x7e => out.push(char::from(b)),
        _ => {
            let _ = write!(out, "\\x{b:02x}");
        }
    }
}

pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        escape_byte(b, &mut out);
    }
    out
}

/// Inverse of [`escape_bytes`]. Returns `None` on any sequence the escaper
/// never produces.
pub fn unescape_bytes(s: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    let mut bytes = s.bytes();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match bytes.next()? {
            c @ (b'\\' | b'"') => out.push(c),
            b'x' => {
                let hi = hex_val(bytes.next()?)?;
                let lo = hex_val(bytes.next()?)?;
                out.push(hi << 4 | lo);
            }
            _ => return None,
        }
    }
    Some(out)
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}
