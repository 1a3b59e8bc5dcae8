//! Default process instruments, refreshed on every render.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use super::{Collector, Gauge, MetricsError, Registry};

pub struct ProcessMetrics {
    started: Instant,
    uptime: Gauge,
    resident_memory: Gauge,
    virtual_memory: Gauge,
    open_fds: Gauge,
}

impl ProcessMetrics {
    /// Register the process gauges plus the collector that refreshes them.
    pub fn register(registry: &Registry) -> Result<Arc<Self>, MetricsError> {
        let start_time = Gauge::new(
            "process_start_time_seconds",
            "Start time of the process since unix epoch in seconds.",
            &[],
        )?;
        let uptime = Gauge::new(
            "process_uptime_seconds",
            "Seconds elapsed since the metrics registry was created.",
            &[],
        )?;
        let resident_memory = Gauge::new(
            "process_resident_memory_bytes",
            "Resident memory size in bytes.",
            &[],
        )?;
        let virtual_memory = Gauge::new(
            "process_virtual_memory_bytes",
            "Virtual memory size in bytes.",
            &[],
        )?;
        let open_fds = Gauge::new("process_open_fds", "Number of open file descriptors.", &[])?;

        let epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        start_time.set(&[], epoch.floor())?;

        registry.register(start_time)?;
        registry.register(uptime.clone())?;
        registry.register(resident_memory.clone())?;
        registry.register(virtual_memory.clone())?;
        registry.register(open_fds.clone())?;

        let this = Arc::new(Self {
            started: Instant::now(),
            uptime,
            resident_memory,
            virtual_memory,
            open_fds,
        });
        registry.register_collector(this.clone());
        Ok(this)
    }
}

impl Collector for ProcessMetrics {
    fn collect(&self) {
        set_or_trace(&self.uptime, self.started.elapsed().as_secs_f64());
        if let Some(mem) = read_memory() {
            set_or_trace(&self.resident_memory, mem.resident as f64);
            set_or_trace(&self.virtual_memory, mem.virtual_size as f64);
        }
        if let Some(n) = count_open_fds() {
            set_or_trace(&self.open_fds, n as f64);
        }
    }
}

fn set_or_trace(g: &Gauge, v: f64) {
    if let Err(e) = g.set(&[], v) {
        tracing::debug!(error = %e, "process metric update failed");
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
struct Memory {
    resident: u64,
    virtual_size: u64,
}

#[cfg(target_os = "linux")]
fn read_memory() -> Option<Memory> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    Some(Memory {
        resident: status_kb(&status, "VmRSS:")? * 1024,
        virtual_size: status_kb(&status, "VmSize:")? * 1024,
    })
}

#[cfg(target_os = "linux")]
fn status_kb(status: &str, key: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|l| l.strip_prefix(key))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
}

#[cfg(target_os = "linux")]
fn count_open_fds() -> Option<usize> {
    std::fs::read_dir("/proc/self/fd").ok().map(|d| d.count())
}

#[cfg(not(target_os = "linux"))]
fn read_memory() -> Option<Memory> {
    None
}

#[cfg(not(target_os = "linux"))]
fn count_open_fds() -> Option<usize> {
    None
}
