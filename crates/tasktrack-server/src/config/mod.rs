//! Server config loader (strict parsing).
//!
//! Lookup order: `$TASKTRACK_CONFIG`, then `tasktrack.yaml` in the working
//! directory, then built-in defaults. `$PORT` overrides `server.port` last.

pub mod schema;

use std::fs;
use std::path::Path;

use tasktrack_core::error::{Result, TaskTrackError};

pub use schema::{LoggingSection, MetricsSection, ServerConfig, ServerSection};

const DEFAULT_CONFIG_FILE: &str = "tasktrack.yaml";

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TaskTrackError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| TaskTrackError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the effective config from the environment.
pub fn load() -> Result<ServerConfig> {
    let cfg = match std::env::var("TASKTRACK_CONFIG") {
        Ok(path) => load_from_file(&path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => load_from_file(DEFAULT_CONFIG_FILE)?,
        Err(_) => ServerConfig::default(),
    };
    cfg.with_port_override(std::env::var("PORT").ok().as_deref())
}
