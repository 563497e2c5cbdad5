//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use crate::error::{GatewayError, Result};

pub use schema::{ConversionSection, GatewaySection, ReplayConfig};

pub fn load_from_file(path: &str) -> Result<ReplayConfig> {
    let s = fs::read_to_string(path)?;
    load_from_str(&s)
}

/// Like [`load_from_file`], but a missing file yields the defaults.
pub fn load_or_default(path: &str) -> Result<ReplayConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(%path, "config file not found, using defaults");
            Ok(ReplayConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn load_from_str(s: &str) -> Result<ReplayConfig> {
    let cfg: ReplayConfig =
        serde_yaml::from_str(s).map_err(|e| GatewayError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
