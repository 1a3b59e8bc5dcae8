//! Shared application state for the tasktrack server.
//!
//! The metrics registry is created here, once, and threaded to every
//! component through this state. Startup errors are returned, not panicked.

use std::sync::Arc;

use tasktrack_core::error::Result;

use crate::config::ServerConfig;
use crate::obs::metrics::ServerMetrics;
use crate::tasks::TaskStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<ServerMetrics>,
}

struct AppStateInner {
    cfg: ServerConfig,
    tasks: TaskStore,
}

impl AppState {
    /// Build application state. Fails on an inconsistent metrics surface
    /// (e.g. duplicate instrument names); callers should abort startup.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        let metrics = Arc::new(ServerMetrics::new(&cfg.metrics.http_buckets)?);
        let tasks = TaskStore::new(Arc::clone(&metrics));

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, tasks }),
            metrics,
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.inner.tasks
    }

    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }
}
