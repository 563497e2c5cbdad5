//! Python source literals with `repr()`-compatible quoting.
//!
//! Strings and bytes pick single quotes unless the text contains a single
//! quote and no double quote. Non-printable characters become `\xNN`,
//! `\uNNNN` or `\UNNNNNNNN` escapes.

use std::fmt::Write;

use serde_json::Value;
use unicode_general_category::{get_general_category, GeneralCategory};

use crate::http::{BodyValue, FormValue, Headers};

/// Anything that can be written as a Python expression.
pub trait PyLiteral {
    fn write_py(&self, out: &mut String);

    fn to_py(&self) -> String {
        let mut out = String::new();
        self.write_py(&mut out);
        out
    }
}

impl PyLiteral for str {
    fn write_py(&self, out: &mut String) {
        let quote = pick_quote(self.contains('\''), self.contains('"'));
        out.push(quote);
        for c in self.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\t' => out.push_str("\\t"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                ' '..='~' => out.push(c),
                c if is_printable(c) => out.push(c),
                c => push_char_escape(out, c),
            }
        }
        out.push(quote);
    }
}

impl PyLiteral for String {
    fn write_py(&self, out: &mut String) {
        self.as_str().write_py(out);
    }
}

impl PyLiteral for [u8] {
    fn write_py(&self, out: &mut String) {
        let quote = pick_quote(self.contains(&b'\''), self.contains(&b'"'));
        out.push('b');
        out.push(quote);
        for &b in self {
            match b {
                b'\\' => out.push_str("\\\\"),
                b'\t' => out.push_str("\\t"),
                b'\n' => out.push_str("\\n"),
                b'\r' => out.push_str("\\r"),
                b if char::from(b) == quote => {
                    out.push('\\');
                    out.push(quote);
                }
                0x20..=0x7e => out.push(char::from(b)),
                b => {
                    let _ = write!(out, "\\x{b:02x}");
                }
            }
        }
        out.push(quote);
    }
}

impl PyLiteral for Value {
    fn write_py(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("None"),
            Value::Bool(true) => out.push_str("True"),
            Value::Bool(false) => out.push_str("False"),
            Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => {
                    let _ = write!(out, "{i}");
                }
                (None, Some(u), _) => {
                    let _ = write!(out, "{u}");
                }
                (None, None, Some(f)) => out.push_str(&py_float(f)),
                (None, None, None) => out.push_str(&n.to_string()),
            },
            Value::String(s) => s.write_py(out),
            Value::Array(items) => write_list(out, items.iter().map(|v| v as &dyn PyLiteral)),
            Value::Object(map) => write_dict(
                out,
                map.iter().map(|(k, v)| (k.as_str(), v as &dyn PyLiteral)),
            ),
        }
    }
}

impl PyLiteral for Headers {
    fn write_py(&self, out: &mut String) {
        write_dict(out, self.entries().iter().map(|(k, v)| (k.as_str(), v as &dyn PyLiteral)));
    }
}

impl PyLiteral for FormValue {
    fn write_py(&self, out: &mut String) {
        match self {
            FormValue::Single(v) => v.write_py(out),
            FormValue::Many(vs) => write_list(out, vs.iter().map(|v| v as &dyn PyLiteral)),
        }
    }
}

impl PyLiteral for BodyValue {
    fn write_py(&self, out: &mut String) {
        match self {
            BodyValue::Absent => out.push_str("None"),
            BodyValue::Bytes(b) => b[..].write_py(out),
            BodyValue::Form(fields) => write_dict(
                out,
                fields.iter().map(|(k, v)| (k.as_str(), v as &dyn PyLiteral)),
            ),
            BodyValue::Json(v) => v.write_py(out),
        }
    }
}

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double {
        '"'
    } else {
        '\''
    }
}

/// `str.isprintable()` for one char: `Cc`, `Cf`, `Cs`,
/// `Co`, `Cn` and every separator except U+0020 are escaped.
fn is_printable(c: char) -> bool {
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::SpaceSeparator
    )
}

fn push_char_escape(out: &mut String, c: char) {
    let cp = u32::from(c);
    let _ = match cp {
        0..=0xff => write!(out, "\\x{cp:02x}"),
        0x100..=0xffff => write!(out, "\\u{cp:04x}"),
        _ => write!(out, "\\U{cp:08x}"),
    };
}

fn write_list<'a>(out: &mut String, items: impl Iterator<Item = &'a dyn PyLiteral>) {
    out.push('[');
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item.write_py(out);
    }
    out.push(']');
}

fn write_dict<'a>(out: &mut String, entries: impl Iterator<Item = (&'a str, &'a dyn PyLiteral)>) {
    out.push('{');
    for (i, (key, value)) in entries.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        key.write_py(out);
        out.push_str(": ");
        value.write_py(out);
    }
    out.push('}');
}

/// `repr(float)`: shortest round-trip digits, scientific outside `1e-4..1e16`.
fn py_float(f: f64) -> String {
    if f.is_nan() {
        return "float('nan')".into();
    }
    if f.is_infinite() {
        return if f > 0.0 { "float('inf')".into() } else { "-float('inf')".into() };
    }

    let sci = format!("{:e}", f.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or_default();
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let sign = if f.is_sign_negative() { "-" } else { "" };

    if (-4..16).contains(&exp) {
        if exp >= 0 {
            let int_len = (exp + 1) as usize;
            if digits.len() <= int_len {
                format!("{sign}{digits}{}.0", "0".repeat(int_len - digits.len()))
            } else {
                format!("{sign}{}.{}", &digits[..int_len], &digits[int_len..])
            }
        } else {
            format!("{sign}0.{}{digits}", "0".repeat((-exp - 1) as usize))
        }
    } else {
        let (head, tail) = digits.split_at(1);
        let mantissa = if tail.is_empty() { head.to_string() } else { format!("{head}.{tail}") };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{sign}{mantissa}e{exp_sign}{:02}", exp.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_follow_repr_quoting() {
        assert_eq!("abc".to_py(), "'abc'");
        assert_eq!("it's".to_py(), "\"it's\"");
        assert_eq!("both ' and \"".to_py(), "'both \\' and \"'");
        assert_eq!("a\\b\n\t\r".to_py(), "'a\\\\b\\n\\t\\r'");
        assert_eq!("\x00\x7f".to_py(), "'\\x00\\x7f'");
        assert_eq!("caf\u{e9}".to_py(), "'caf\u{e9}'");
        assert_eq!("nb\u{a0}sp".to_py(), "'nb\\xa0sp'");
        assert_eq!("\u{2028}".to_py(), "'\\u2028'");
    }

    #[test]
    fn format_private_and_unassigned_chars_are_escaped() {
        assert_eq!("soft\u{ad}hyphen".to_py(), "'soft\\xadhyphen'");
        assert_eq!("zero\u{200b}width".to_py(), "'zero\\u200bwidth'");
        assert_eq!("\u{e000}".to_py(), "'\\ue000'");
        assert_eq!("\u{10ffff}".to_py(), "'\\U0010ffff'");
        assert_eq!("\u{20ac} \u{4e2d}".to_py(), "'\u{20ac} \u{4e2d}'");
    }

    #[test]
    fn bytes_follow_repr_quoting() {
        assert_eq!(b"abc"[..].to_py(), "b'abc'");
        assert_eq!(b"\x00\xffx"[..].to_py(), "b'\\x00\\xffx'");
        assert_eq!(b"it's"[..].to_py(), "b\"it's\"");
        assert_eq!(b"a\r\nb"[..].to_py(), "b'a\\r\\nb'");
        assert_eq!(b""[..].to_py(), "b''");
    }

    #[test]
    fn json_values_become_python_literals() {
        let v = json!({"b": [1, -2, 1.5, true, false, null], "a": {"x": "y"}});
        assert_eq!(v.to_py(), "{'b': [1, -2, 1.5, True, False, None], 'a': {'x': 'y'}}");
        assert_eq!(json!({}).to_py(), "{}");
        assert_eq!(json!([]).to_py(), "[]");
    }

    #[test]
    fn floats_match_python_repr() {
        assert_eq!(py_float(1.0), "1.0");
        assert_eq!(py_float(-0.5), "-0.5");
        assert_eq!(py_float(0.0001), "0.0001");
        assert_eq!(py_float(0.00001), "1e-05");
        assert_eq!(py_float(1e16), "1e+16");
        assert_eq!(py_float(1234.5), "1234.5");
        assert_eq!(py_float(1.5e300), "1.5e+300");
        assert_eq!(py_float(123456789012345.0), "123456789012345.0");
    }

    #[test]
    fn headers_and_forms_render_as_dicts() {
        let mut h = Headers::new();
        h.insert("User-Agent", "curl/8.0");
        h.insert("Cookie", "session=abc'1");
        assert_eq!(h.to_py(), "{'User-Agent': 'curl/8.0', 'Cookie': \"session=abc'1\"}");
        assert_eq!(Headers::new().to_py(), "{}");

        let form = BodyValue::Form(vec![
            ("a".into(), FormValue::Single("1".into())),
            ("b".into(), FormValue::Many(vec!["x".into(), "y".into()])),
        ]);
        assert_eq!(form.to_py(), "{'a': '1', 'b': ['x', 'y']}");
        assert_eq!(BodyValue::Absent.to_py(), "None");
    }
}
