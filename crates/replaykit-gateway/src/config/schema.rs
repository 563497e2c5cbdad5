use std::net::SocketAddr;

use serde::Deserialize;

use replaykit_core::{RawScriptOptions, RequestOptions};

use crate::error::{GatewayError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub conversion: ConversionSection,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            conversion: ConversionSection::default(),
        }
    }
}

impl ReplayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GatewayError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.gateway.validate()?;
        self.conversion.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1024..=64 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(GatewayError::Config(
                "gateway.max_body_bytes must be between 1024 and 67108864".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            GatewayError::Config(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:5000".into()
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Defaults for the conversion switches when a request does not set them.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionSection {
    #[serde(default = "default_true")]
    pub tokenize: bool,

    #[serde(default)]
    pub single_use_session: bool,

    #[serde(default = "default_true")]
    pub flow_use_session: bool,

    #[serde(default = "default_sync_suffix_len")]
    pub sync_suffix_len: usize,
}

impl Default for ConversionSection {
    fn default() -> Self {
        Self {
            tokenize: true,
            single_use_session: false,
            flow_use_session: true,
            sync_suffix_len: default_sync_suffix_len(),
        }
    }
}

impl ConversionSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=4096).contains(&self.sync_suffix_len) {
            return Err(GatewayError::Config(
                "conversion.sync_suffix_len must be between 1 and 4096".into(),
            ));
        }
        Ok(())
    }

    pub fn single_options(&self) -> RequestOptions {
        RequestOptions {
            tokenize: self.tokenize,
            use_session: self.single_use_session,
        }
    }

    pub fn flow_options(&self) -> RequestOptions {
        RequestOptions {
            tokenize: self.tokenize,
            use_session: self.flow_use_session,
        }
    }

    pub fn raw_options(&self) -> RawScriptOptions {
        RawScriptOptions {
            sync_suffix_len: self.sync_suffix_len,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_sync_suffix_len() -> usize {
    replaykit_core::render::SYNC_SUFFIX_LEN
}
