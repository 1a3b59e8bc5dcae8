use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::atomic::AtomicF64;
use super::text::{fmt_value, write_header, write_sample};
use super::{Desc, MetricsError};

/// Upper bounds (seconds) used for HTTP request durations unless configured otherwise.
pub const DEFAULT_BUCKETS: [f64; 5] = [0.1, 0.5, 1.0, 2.0, 5.0];

/// Cumulative histogram with fixed bucket bounds.
#[derive(Clone)]
pub struct Histogram {
    inner: Arc<HistogramCore>,
}

struct HistogramCore {
    desc: Desc,
    bounds: Vec<f64>,
    series: DashMap<Vec<String>, Series>,
}

struct Series {
    buckets: Vec<AtomicU64>,
    count: AtomicU64,
    sum: AtomicF64,
}

impl Series {
    fn new(n: usize) -> Self {
        Self {
            buckets: (0..n).map(|_| AtomicU64::new(0)).collect(),
            count: AtomicU64::new(0),
            sum: AtomicF64::default(),
        }
    }

    // Writes go from the widest bucket (`count`) down to the narrowest and
    // reads go the other way, so a snapshot never shows a narrower bucket
    // ahead of a wider one.
    fn observe(&self, bounds: &[f64], value: f64) {
        self.count.fetch_add(1, Ordering::Release);
        for (i, &b) in bounds.iter().enumerate().rev() {
            if value <= b {
                self.buckets[i].fetch_add(1, Ordering::Release);
            }
        }
        self.sum.add(value);
    }

    fn snapshot(&self, bounds: &[f64]) -> HistogramSnapshot {
        let buckets = bounds
            .iter()
            .zip(&self.buckets)
            .map(|(&b, c)| (b, c.load(Ordering::Acquire)))
            .collect();
        HistogramSnapshot {
            buckets,
            count: self.count.load(Ordering::Acquire),
            sum: self.sum.load(),
        }
    }
}

/// Point-in-time copy of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// `(upper_bound, cumulative_count)` per configured bucket.
    pub buckets: Vec<(f64, u64)>,
    /// Total observations; also the value of the `+Inf` bucket.
    pub count: u64,
    pub sum: f64,
}

impl Histogram {
    pub fn new(
        name: &str,
        help: &str,
        label_names: &[&str],
        bounds: &[f64],
    ) -> Result<Self, MetricsError> {
        if label_names.contains(&"le") {
            return Err(MetricsError::InvalidName(format!(
                "{name}: label \"le\" is reserved for histograms"
            )));
        }
        let desc = Desc::new(name, help, label_names)?;
        validate_bounds(name, bounds)?;

        let series = DashMap::new();
        if desc.label_names.is_empty() {
            series.insert(Vec::new(), Series::new(bounds.len()));
        }
        Ok(Self {
            inner: Arc::new(HistogramCore {
                desc,
                bounds: bounds.to_vec(),
                series,
            }),
        })
    }

    pub fn desc(&self) -> &Desc {
        &self.inner.desc
    }

    /// Record one observation for a label tuple.
    pub fn observe(&self, labels: &[&str], value: f64) -> Result<(), MetricsError> {
        if !value.is_finite() {
            return Err(MetricsError::InvalidValue {
                name: self.inner.desc.name.clone(),
                value,
            });
        }
        let key = self.inner.desc.key(labels)?;
        let bounds = &self.inner.bounds;
        if let Some(s) = self.inner.series.get(&key) {
            s.observe(bounds, value);
            return Ok(());
        }
        self.inner
            .series
            .entry(key)
            .or_insert_with(|| Series::new(bounds.len()))
            .observe(bounds, value);
        Ok(())
    }

    pub fn snapshot(&self, labels: &[&str]) -> Option<HistogramSnapshot> {
        let key = self.inner.desc.key(labels).ok()?;
        self.inner
            .series
            .get(&key)
            .map(|s| s.snapshot(&self.inner.bounds))
    }

    pub(crate) fn render(&self, out: &mut String) {
        let desc = &self.inner.desc;
        let name = &desc.name;
        write_header(out, name, &desc.help, "histogram");

        let mut rows: Vec<(Vec<String>, HistogramSnapshot)> = self
            .inner
            .series
            .iter()
            .map(|r| (r.key().clone(), r.value().snapshot(&self.inner.bounds)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let bucket_name = format!("{name}_bucket");
        let sum_name = format!("{name}_sum");
        let count_name = format!("{name}_count");
        for (values, snap) in rows {
            for (le, c) in &snap.buckets {
                let le = fmt_value(*le);
                write_sample(
                    out,
                    &bucket_name,
                    &desc.label_names,
                    &values,
                    Some(("le", le.as_str())),
                    *c as f64,
                );
            }
            write_sample(
                out,
                &bucket_name,
                &desc.label_names,
                &values,
                Some(("le", "+Inf")),
                snap.count as f64,
            );
            write_sample(out, &sum_name, &desc.label_names, &values, None, snap.sum);
            write_sample(out, &count_name, &desc.label_names, &values, None, snap.count as f64);
        }
    }
}

/// Bucket bounds must be non-empty, finite and strictly ascending.
pub fn validate_bounds(name: &str, bounds: &[f64]) -> Result<(), MetricsError> {
    let invalid = |reason: &str| MetricsError::InvalidBuckets {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if bounds.is_empty() {
        return Err(invalid("at least one bucket is required"));
    }
    if bounds.iter().any(|b| !b.is_finite()) {
        return Err(invalid("bounds must be finite (+Inf is implicit)"));
    }
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("bounds must be strictly ascending"));
    }
    Ok(())
}
