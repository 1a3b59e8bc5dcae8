//! Registry registration and Prometheus text rendering.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tasktrack_core::metrics::{Counter, Gauge, Histogram, MetricsError, ProcessMetrics, Registry};

fn custom_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| !l.contains("process_")).collect()
}

#[test]
fn duplicate_name_is_an_error() {
    let r = Registry::new();
    r.register(Counter::new("tasks_total", "a", &["operation"]).unwrap())
        .unwrap();
    let err = r
        .register(Gauge::new("tasks_total", "b", &[]).unwrap())
        .unwrap_err();
    assert_eq!(err, MetricsError::DuplicateName("tasks_total".into()));
    assert_eq!(r.len(), 1);
}

#[test]
fn render_follows_registration_order_and_format() {
    let r = Registry::new();
    let g = Gauge::new("zz_active", "Active things", &[]).unwrap();
    let c = Counter::new("aa_total", "Total ops", &["operation"]).unwrap();
    r.register(g.clone()).unwrap();
    r.register(c.clone()).unwrap();

    c.inc(&["b"]).unwrap();
    c.increment(&["a"], 2.0).unwrap();
    g.set(&[], 3.0).unwrap();

    let expected = "\
# HELP zz_active Active things
# TYPE zz_active gauge
zz_active 3
# HELP aa_total Total ops
# TYPE aa_total counter
aa_total{operation=\"a\"} 2
aa_total{operation=\"b\"} 1
";
    assert_eq!(r.render(), expected);
}

#[test]
fn histogram_renders_buckets_sum_and_count() {
    let r = Registry::new();
    let h = Histogram::new("req_seconds", "Latency", &["method"], &[0.1, 1.0]).unwrap();
    r.register(h.clone()).unwrap();
    h.observe(&["GET"], 0.5).unwrap();

    let text = r.render();
    assert!(text.contains("# TYPE req_seconds histogram\n"));
    assert!(text.contains("req_seconds_bucket{method=\"GET\",le=\"0.1\"} 0\n"));
    assert!(text.contains("req_seconds_bucket{method=\"GET\",le=\"1\"} 1\n"));
    assert!(text.contains("req_seconds_bucket{method=\"GET\",le=\"+Inf\"} 1\n"));
    assert!(text.contains("req_seconds_sum{method=\"GET\"} 0.5\n"));
    assert!(text.contains("req_seconds_count{method=\"GET\"} 1\n"));
}

#[test]
fn one_sample_line_per_tuple_and_render_is_idempotent() {
    let r = Registry::with_process_metrics().unwrap();
    let c = Counter::new("tasks_total", "ops", &["operation"]).unwrap();
    r.register(c.clone()).unwrap();
    for op in ["created", "deleted", "created", "completed"] {
        c.inc(&[op]).unwrap();
    }

    let first = r.render();
    let samples = first
        .lines()
        .filter(|l| l.starts_with("tasks_total{"))
        .count();
    assert_eq!(samples, 3);

    let second = r.render();
    assert_eq!(custom_lines(&first), custom_lines(&second));
}

#[test]
fn label_values_are_escaped() {
    let r = Registry::new();
    let c = Counter::new("paths_total", "Paths", &["path"]).unwrap();
    r.register(c.clone()).unwrap();
    c.inc(&["/a\"b\\c\nd"]).unwrap();

    assert!(r
        .render()
        .contains("paths_total{path=\"/a\\\"b\\\\c\\nd\"} 1\n"));
}

#[test]
fn process_metrics_are_included_first() {
    let r = Registry::with_process_metrics().unwrap();
    r.register(Gauge::new("active_tasks", "Active", &[]).unwrap())
        .unwrap();

    let text = r.render();
    let start = text.find("process_start_time_seconds").unwrap();
    let uptime = text.find("process_uptime_seconds").unwrap();
    let custom = text.find("active_tasks").unwrap();
    assert!(start < uptime && uptime < custom);
    assert!(r.contains("process_resident_memory_bytes"));
    assert!(matches!(
        ProcessMetrics::register(&r),
        Err(MetricsError::DuplicateName(_))
    ));
}
