//! Request body tokenization by content type.

use bytes::Bytes;

use crate::error::{ReplayError, Result};

/// Closed set of body kinds, selected by content-type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Form,
    Json,
    Text,
    Multipart,
    Opaque,
}

impl BodyKind {
    pub fn from_content_type(content_type: &str) -> Self {
        let ct = content_type.trim_start();
        if ct.starts_with("application/x-www-form-urlencoded") {
            BodyKind::Form
        } else if ct.starts_with("application/json") {
            BodyKind::Json
        } else if ct.starts_with("text/plain") {
            BodyKind::Text
        } else if ct.starts_with("multipart/form-data") {
            BodyKind::Multipart
        } else {
            BodyKind::Opaque
        }
    }

    /// Keyword argument the HTTP client expects for this kind.
    pub fn param(self) -> ParamName {
        match self {
            BodyKind::Json => ParamName::Json,
            BodyKind::Multipart => ParamName::Files,
            BodyKind::Form | BodyKind::Text | BodyKind::Opaque => ParamName::Data,
        }
    }
}

/// Name of the keyword argument carrying the body (`data=`, `json=`, `files=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamName {
    Data,
    Json,
    Files,
}

impl ParamName {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::Data => "data",
            ParamName::Json => "json",
            ParamName::Files => "files",
        }
    }
}

/// Value of one form field after grouping repeated keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Single(String),
    Many(Vec<String>),
}

/// Body as it will be passed to the generated client call.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyValue {
    /// The request carried no body section at all.
    Absent,
    Bytes(Bytes),
    /// Form fields in first-occurrence order.
    Form(Vec<(String, FormValue)>),
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedBody {
    pub value: BodyValue,
    pub param: ParamName,
}

impl TokenizedBody {
    fn data(value: BodyValue) -> Self {
        Self {
            value,
            param: ParamName::Data,
        }
    }
}

/// Turn raw body bytes into the value handed to the client call.
///
/// With `tokenize == false`, or an empty body, the bytes pass through untouched.
pub fn tokenize_body(
    content_type: &str,
    body: Option<Bytes>,
    tokenize: bool,
) -> Result<TokenizedBody> {
    let Some(body) = body else {
        return Ok(TokenizedBody::data(BodyValue::Absent));
    };
    if !tokenize || body.is_empty() {
        return Ok(TokenizedBody::data(BodyValue::Bytes(body)));
    }

    let kind = BodyKind::from_content_type(content_type);
    let value = match kind {
        BodyKind::Form => BodyValue::Form(parse_form(&body)?),
        BodyKind::Json => BodyValue::Json(
            serde_json::from_slice(&body)
                .map_err(|e| ReplayError::MalformedBody(format!("invalid json body: {e}")))?,
        ),
        BodyKind::Text | BodyKind::Opaque => BodyValue::Bytes(body),
        BodyKind::Multipart => {
            return Err(ReplayError::UnsupportedBody(
                "forms with files (multipart/form-data) are not yet implemented".into(),
            ))
        }
    };

    Ok(TokenizedBody {
        value,
        param: kind.param(),
    })
}

/// Query-string style parsing: blank values and bare names are dropped,
/// keys seen once collapse to a scalar.
fn parse_form(body: &[u8]) -> Result<Vec<(String, FormValue)>> {
    std::str::from_utf8(body)
        .map_err(|e| ReplayError::MalformedBody(format!("form body is not utf-8: {e}")))?;

    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        if value.is_empty() {
            continue;
        }
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into_owned()),
            None => grouped.push((key.into_owned(), vec![value.into_owned()])),
        }
    }

    Ok(grouped
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                FormValue::Single(values.remove(0))
            } else {
                FormValue::Many(values)
            };
            (key, value)
        })
        .collect())
}
