//! Request method normalisation.

use crate::error::{ReplayError, Result};

/// Methods the generated HTTP client can issue (`requests.<method>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
}

impl Method {
    /// Parse a case-insensitive method token.
    pub fn parse(token: &str) -> Result<Self> {
        match token.to_ascii_lowercase().as_str() {
            "delete" => Ok(Method::Delete),
            "get" => Ok(Method::Get),
            "head" => Ok(Method::Head),
            "options" => Ok(Method::Options),
            "patch" => Ok(Method::Patch),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            _ => Err(ReplayError::InvalidMethod(token.to_string())),
        }
    }

    /// Lowercase name, as used in `requests.<name>(...)`.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Delete => "delete",
            Method::Get => "get",
            Method::Head => "head",
            Method::Options => "options",
            Method::Patch => "patch",
            Method::Post => "post",
            Method::Put => "put",
        }
    }
}
