//! Server instruments and the task lifecycle → metrics bridge.
//!
//! All instruments live in one `Registry` created at startup. Recording never
//! fails a request: errors are logged at warn and dropped.

use std::time::Duration;

use tasktrack_core::metrics::{Counter, Gauge, Histogram, MetricsError, Registry};

/// Completed-request sample consumed by the duration histogram.
#[derive(Debug, Clone)]
pub struct RequestSample {
    pub method: String,
    /// Matched route template, or the raw path when nothing matched.
    pub route: String,
    pub status: u16,
    pub elapsed: Duration,
}

pub struct ServerMetrics {
    registry: Registry,
    http_request_duration: Histogram,
    tasks_total: Counter,
    active_tasks: Gauge,
}

impl ServerMetrics {
    /// Build the registry (process metrics first) and register the server instruments.
    /// A duplicate name here means the metrics surface is inconsistent; callers treat it as fatal.
    pub fn new(http_buckets: &[f64]) -> Result<Self, MetricsError> {
        let registry = Registry::with_process_metrics()?;

        let http_request_duration = Histogram::new(
            "http_request_duration_seconds",
            "Duration of HTTP requests in seconds",
            &["method", "route", "status_code"],
            http_buckets,
        )?;
        let tasks_total = Counter::new(
            "tasks_total",
            "Total number of task operations",
            &["operation"],
        )?;
        let active_tasks = Gauge::new("active_tasks", "Number of active (non-completed) tasks", &[])?;

        registry.register(http_request_duration.clone())?;
        registry.register(tasks_total.clone())?;
        registry.register(active_tasks.clone())?;

        Ok(Self {
            registry,
            http_request_duration,
            tasks_total,
            active_tasks,
        })
    }

    pub fn render(&self) -> String {
        self.registry.render()
    }

    pub fn observe_request(&self, sample: &RequestSample) {
        let status = sample.status.to_string();
        let res = self.http_request_duration.observe(
            &[sample.method.as_str(), sample.route.as_str(), status.as_str()],
            sample.elapsed.as_secs_f64(),
        );
        log_failure("http_request_duration_seconds", res);
    }

    pub fn on_task_created(&self) {
        self.bump("created");
    }

    /// Counts only real transitions; same-status updates are ignored.
    pub fn on_task_status_changed(&self, was_completed: bool, is_completed: bool) {
        match (was_completed, is_completed) {
            (false, true) => self.bump("completed"),
            (true, false) => self.bump("reopened"),
            _ => {}
        }
    }

    pub fn on_task_deleted(&self) {
        self.bump("deleted");
    }

    /// Set the gauge from a fresh full count, never a running delta.
    pub fn recompute_active_gauge(&self, active_count: usize) {
        log_failure("active_tasks", self.active_tasks.set(&[], active_count as f64));
    }

    pub fn tasks_total(&self, operation: &str) -> f64 {
        self.tasks_total.get(&[operation]).unwrap_or(0.0)
    }

    pub fn active_tasks(&self) -> f64 {
        self.active_tasks.get(&[]).unwrap_or(0.0)
    }

    fn bump(&self, operation: &str) {
        log_failure("tasks_total", self.tasks_total.inc(&[operation]));
    }
}

fn log_failure(metric: &str, res: Result<(), MetricsError>) {
    if let Err(e) = res {
        tracing::warn!(metric, error = %e, "metrics recording failed");
    }
}
