use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{Counter, Gauge, Histogram, MetricsError, ProcessMetrics};

/// Anything a `Registry` can own and render.
#[derive(Clone)]
pub enum Instrument {
    Counter(Counter),
    Gauge(Gauge),
    Histogram(Histogram),
}

impl Instrument {
    pub fn name(&self) -> &str {
        match self {
            Instrument::Counter(c) => &c.desc().name,
            Instrument::Gauge(g) => &g.desc().name,
            Instrument::Histogram(h) => &h.desc().name,
        }
    }

    fn render(&self, out: &mut String) {
        match self {
            Instrument::Counter(c) => c.render(out),
            Instrument::Gauge(g) => g.render(out),
            Instrument::Histogram(h) => h.render(out),
        }
    }
}

impl From<Counter> for Instrument {
    fn from(c: Counter) -> Self {
        Instrument::Counter(c)
    }
}

impl From<Gauge> for Instrument {
    fn from(g: Gauge) -> Self {
        Instrument::Gauge(g)
    }
}

impl From<Histogram> for Instrument {
    fn from(h: Histogram) -> Self {
        Instrument::Histogram(h)
    }
}

/// Refreshes instrument values right before each render (pull-style metrics).
pub trait Collector: Send + Sync {
    fn collect(&self);
}

struct Registered {
    seq: u64,
    instrument: Instrument,
}

/// Process-wide set of instruments keyed by unique name.
///
/// Built once at startup and shared by `Arc`; there is no removal. Rendering
/// is not a transaction across instruments: concurrent updates may land
/// between two instruments of the same scrape.
#[derive(Default)]
pub struct Registry {
    instruments: DashMap<String, Registered>,
    collectors: RwLock<Vec<Arc<dyn Collector>>>,
    seq: AtomicU64,
}

impl Registry {
    /// Empty registry without process metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the default process instruments.
    pub fn with_process_metrics() -> Result<Self, MetricsError> {
        let registry = Self::new();
        ProcessMetrics::register(&registry)?;
        Ok(registry)
    }

    /// Register an instrument under its name. Names are unique per registry.
    pub fn register(&self, instrument: impl Into<Instrument>) -> Result<(), MetricsError> {
        let instrument = instrument.into();
        match self.instruments.entry(instrument.name().to_string()) {
            Entry::Occupied(o) => Err(MetricsError::DuplicateName(o.key().clone())),
            Entry::Vacant(v) => {
                let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                v.insert(Registered { seq, instrument });
                Ok(())
            }
        }
    }

    pub fn register_collector(&self, collector: Arc<dyn Collector>) {
        self.collectors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(collector);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instruments.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Render every instrument, in registration order, in Prometheus text format.
    pub fn render(&self) -> String {
        let collectors: Vec<Arc<dyn Collector>> = self
            .collectors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for c in &collectors {
            c.collect();
        }

        // Clone the handles out so no shard lock is held while formatting.
        let mut ordered: Vec<(u64, Instrument)> = self
            .instruments
            .iter()
            .map(|r| (r.value().seq, r.value().instrument.clone()))
            .collect();
        ordered.sort_by_key(|(seq, _)| *seq);

        let mut out = String::new();
        for (_, instrument) in &ordered {
            instrument.render(&mut out);
        }
        out
    }
}
