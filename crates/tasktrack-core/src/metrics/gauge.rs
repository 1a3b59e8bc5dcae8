use std::sync::Arc;

use dashmap::DashMap;

use super::atomic::AtomicF64;
use super::text::{write_header, write_sample};
use super::{Desc, MetricsError};

/// Last-write-wins gauge. An unlabeled gauge owns a single series from construction.
#[derive(Clone)]
pub struct Gauge {
    inner: Arc<GaugeCore>,
}

struct GaugeCore {
    desc: Desc,
    series: DashMap<Vec<String>, AtomicF64>,
}

impl Gauge {
    pub fn new(name: &str, help: &str, label_names: &[&str]) -> Result<Self, MetricsError> {
        let desc = Desc::new(name, help, label_names)?;
        let series = DashMap::new();
        if desc.label_names.is_empty() {
            series.insert(Vec::new(), AtomicF64::default());
        }
        Ok(Self {
            inner: Arc::new(GaugeCore { desc, series }),
        })
    }

    pub fn desc(&self) -> &Desc {
        &self.inner.desc
    }

    /// Overwrite the current value.
    pub fn set(&self, labels: &[&str], value: f64) -> Result<(), MetricsError> {
        let key = self.inner.desc.key(labels)?;
        if let Some(v) = self.inner.series.get(&key) {
            v.store(value);
            return Ok(());
        }
        self.inner
            .series
            .entry(key)
            .or_insert_with(|| AtomicF64::new(value))
            .store(value);
        Ok(())
    }

    pub fn get(&self, labels: &[&str]) -> Option<f64> {
        let key = self.inner.desc.key(labels).ok()?;
        self.inner.series.get(&key).map(|v| v.load())
    }

    pub(crate) fn render(&self, out: &mut String) {
        let desc = &self.inner.desc;
        write_header(out, &desc.name, &desc.help, "gauge");
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
