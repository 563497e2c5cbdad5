//! Shared application state for the replaykit gateway.

use std::sync::Arc;

use crate::config::ReplayConfig;
use crate::error::Result;
use crate::obs::metrics::ReplayMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ReplayConfig,
    metrics: ReplayMetrics,
}

impl AppState {
    /// Build application state from a config that has not been validated yet.
    pub fn new(cfg: ReplayConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics: ReplayMetrics::default(),
            }),
        })
    }

    pub fn cfg(&self) -> &ReplayConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &ReplayMetrics {
        &self.inner.metrics
    }
}
