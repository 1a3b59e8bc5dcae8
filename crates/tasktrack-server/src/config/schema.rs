use serde::Deserialize;
use tasktrack_core::error::{Result, TaskTrackError};
use tasktrack_core::metrics::{validate_bounds, DEFAULT_BUCKETS};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            logging: LoggingSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TaskTrackError::UnsupportedVersion);
        }
        self.logging.validate()?;
        self.metrics.validate()?;
        Ok(())
    }

    /// Apply the `PORT` environment override (value passed in so tests stay hermetic).
    pub fn with_port_override(mut self, port: Option<&str>) -> Result<Self> {
        if let Some(p) = port.map(str::trim).filter(|p| !p.is_empty()) {
            self.server.port = p
                .parse()
                .map_err(|e| TaskTrackError::BadRequest(format!("invalid PORT {p:?}: {e}")))?;
        }
        Ok(self)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3001
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,

    /// `json` or `pretty`.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl LoggingSection {
    pub fn validate(&self) -> Result<()> {
        match self.format.as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(TaskTrackError::BadRequest(format!(
                "logging.format must be \"json\" or \"pretty\", got {other:?}"
            ))),
        }
    }
}

fn default_level() -> String {
    "info".into()
}
fn default_format() -> String {
    "json".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Upper bounds (seconds) of `http_request_duration_seconds`.
    #[serde(default = "default_http_buckets")]
    pub http_buckets: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            http_buckets: default_http_buckets(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        validate_bounds("metrics.http_buckets", &self.http_buckets)
            .map_err(|e| TaskTrackError::BadRequest(e.to_string()))
    }
}

fn default_http_buckets() -> Vec<f64> {
    DEFAULT_BUCKETS.to_vec()
}
