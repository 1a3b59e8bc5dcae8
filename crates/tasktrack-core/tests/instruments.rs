//! Counter / gauge / histogram semantics.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tasktrack_core::metrics::{Counter, Gauge, Histogram, MetricsError, DEFAULT_BUCKETS};

#[test]
fn counter_sums_deltas_per_tuple() {
    let c = Counter::new("ops_total", "ops", &["operation"]).unwrap();
    let deltas = [1.0, 0.0, 3.0, 2.5, 1.0];
    for d in deltas {
        c.increment(&["created"], d).unwrap();
    }
    c.inc(&["deleted"]).unwrap();

    assert_eq!(c.get(&["created"]), Some(deltas.iter().sum::<f64>()));
    assert_eq!(c.get(&["deleted"]), Some(1.0));
    assert_eq!(c.get(&["reopened"]), None);
}

#[test]
fn counter_rejects_negative_delta_without_touching_state() {
    let c = Counter::new("ops_total", "ops", &["operation"]).unwrap();
    c.inc(&["created"]).unwrap();

    let err = c.increment(&["created"], -1.0).unwrap_err();
    assert!(matches!(err, MetricsError::NegativeDelta { .. }));
    let err = c.increment(&["created"], f64::NAN).unwrap_err();
    assert!(matches!(err, MetricsError::NegativeDelta { .. }));

    assert_eq!(c.get(&["created"]), Some(1.0));
}

#[test]
fn label_arity_mismatch_is_rejected() {
    let c = Counter::new("ops_total", "ops", &["operation"]).unwrap();
    let err = c.inc(&[]).unwrap_err();
    assert_eq!(
        err,
        MetricsError::LabelArity {
            name: "ops_total".into(),
            expected: 1,
            got: 0
        }
    );

    let h = Histogram::new("lat", "lat", &["method", "route"], &DEFAULT_BUCKETS).unwrap();
    assert!(matches!(
        h.observe(&["GET"], 0.2),
        Err(MetricsError::LabelArity { expected: 2, got: 1, .. })
    ));

    let g = Gauge::new("active", "active", &[]).unwrap();
    assert!(matches!(g.set(&["x"], 1.0), Err(MetricsError::LabelArity { .. })));
}

#[test]
fn gauge_is_last_write_wins() {
    let g = Gauge::new("active_tasks", "active", &[]).unwrap();
    assert_eq!(g.get(&[]), Some(0.0));
    g.set(&[], 5.0).unwrap();
    g.set(&[], 2.0).unwrap();
    assert_eq!(g.get(&[]), Some(2.0));
}

#[test]
fn histogram_observe_increments_cumulative_buckets() {
    let h = Histogram::new("lat", "lat", &["route"], &DEFAULT_BUCKETS).unwrap();
    h.observe(&["/a"], 0.7).unwrap();

    let s = h.snapshot(&["/a"]).unwrap();
    let counts: Vec<u64> = s.buckets.iter().map(|(_, c)| *c).collect();
    // 0.1, 0.5 < 0.7 <= 1, 2, 5
    assert_eq!(counts, vec![0, 0, 1, 1, 1]);
    assert_eq!(s.count, 1);
    assert!((s.sum - 0.7).abs() < 1e-12);

    h.observe(&["/a"], 0.1).unwrap();
    let s = h.snapshot(&["/a"]).unwrap();
    let counts: Vec<u64> = s.buckets.iter().map(|(_, c)| *c).collect();
    assert_eq!(counts, vec![1, 1, 2, 2, 2]);
    assert_eq!(s.count, 2);
}

#[test]
fn histogram_overflow_only_counts_inf() {
    let h = Histogram::new("lat", "lat", &[], &DEFAULT_BUCKETS).unwrap();
    h.observe(&[], 42.0).unwrap();

    let s = h.snapshot(&[]).unwrap();
    assert!(s.buckets.iter().all(|(_, c)| *c == 0));
    assert_eq!(s.count, 1);
    assert_eq!(s.sum, 42.0);
}

#[test]
fn histogram_rejects_bad_buckets_and_values() {
    for bounds in [&[][..], &[1.0, 1.0][..], &[2.0, 1.0][..], &[1.0, f64::INFINITY][..]] {
        assert!(matches!(
            Histogram::new("lat", "lat", &[], bounds),
            Err(MetricsError::InvalidBuckets { .. })
        ));
    }
    assert!(matches!(
        Histogram::new("lat", "lat", &["le"], &DEFAULT_BUCKETS),
        Err(MetricsError::InvalidName(_))
    ));

    let h = Histogram::new("lat", "lat", &[], &DEFAULT_BUCKETS).unwrap();
    assert!(matches!(h.observe(&[], f64::NAN), Err(MetricsError::InvalidValue { .. })));
    assert_eq!(h.snapshot(&[]).unwrap().count, 0);
}

#[test]
fn invalid_names_are_rejected() {
    assert!(Counter::new("9lives", "x", &[]).is_err());
    assert!(Counter::new("has-dash", "x", &[]).is_err());
    assert!(Counter::new("ok_name", "x", &["__reserved"]).is_err());
    assert!(Counter::new("ok_name", "x", &["dup", "dup"]).is_err());
    assert!(Counter::new("ns:ok_name", "x", &["a", "b"]).is_ok());
}
