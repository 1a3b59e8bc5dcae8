use std::sync::Arc;

use dashmap::DashMap;

use super::atomic::AtomicF64;
use super::text::{write_header, write_sample};
use super::{Desc, MetricsError};

/// Monotonic counter with a fixed label schema.
#[derive(Clone)]
pub struct Counter {
    inner: Arc<CounterCore>,
}

struct CounterCore {
    desc: Desc,
    series: DashMap<Vec<String>, AtomicF64>,
}

impl Counter {
    pub fn new(name: &str, help: &str, label_names: &[&str]) -> Result<Self, MetricsError> {
        let desc = Desc::new(name, help, label_names)?;
        let series = DashMap::new();
        if desc.label_names.is_empty() {
            series.insert(Vec::new(), AtomicF64::default());
        }
        Ok(Self {
            inner: Arc::new(CounterCore { desc, series }),
        })
    }

    pub fn desc(&self) -> &Desc {
        &self.inner.desc
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[&str]) -> Result<(), MetricsError> {
        self.increment(labels, 1.0)
    }

    /// Increment by `delta`. Negative (or NaN) deltas are rejected.
    pub fn increment(&self, labels: &[&str], delta: f64) -> Result<(), MetricsError> {
        if delta.is_nan() || delta < 0.0 {
            return Err(MetricsError::NegativeDelta {
                name: self.inner.desc.name.clone(),
                delta,
            });
        }
        if delta.is_infinite() {
            return Err(MetricsError::InvalidValue {
                name: self.inner.desc.name.clone(),
                value: delta,
            });
        }
        let key = self.inner.desc.key(labels)?;
        if let Some(v) = self.inner.series.get(&key) {
            v.add(delta);
            return Ok(());
        }
        self.inner.series.entry(key).or_default().add(delta);
        Ok(())
    }

    /// Current value for a label tuple, `None` if it was never observed.
    pub fn get(&self, labels: &[&str]) -> Option<f64> {
        let key = self.inner.desc.key(labels).ok()?;
        self.inner.series.get(&key).map(|v| v.load())
    }

    pub(crate) fn render(&self, out: &mut String) {
        let desc = &self.inner.desc;
        write_header(out, &desc.name, &desc.help, "counter");
        let mut rows: Vec<(Vec<String>, f64)> = self
            .inner
            .series
            .iter()
            .map(|r| (r.key().clone(), r.value().load()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (values, v) in rows {
            write_sample(out, &desc.name, &desc.label_names, &values, None, v);
        }
    }
}
