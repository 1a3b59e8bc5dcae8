//! Prometheus text exposition helpers.

use std::fmt::Write;

/// Helper to escape label values.
pub(crate) fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Format a sample value the way scrapers expect (`+Inf`, `-Inf`, `NaN`).
pub(crate) fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{v}")
    }
}

pub(crate) fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(help));
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

/// Write `{a="x",b="y"}` (plus an optional trailing pair such as `le`).
/// Writes nothing when there are no pairs at all.
pub(crate) fn write_labels(
    out: &mut String,
    names: &[String],
    values: &[String],
    extra: Option<(&str, &str)>,
) {
    if names.is_empty() && extra.is_none() {
        return;
    }
    let mut pairs: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect();
    if let Some((k, v)) = extra {
        pairs.push(format!("{}=\"{}\"", k, escape_label(v)));
    }
    let _ = write!(out, "{{{}}}", pairs.join(","));
}

pub(crate) fn write_sample(
    out: &mut String,
    name: &str,
    names: &[String],
    values: &[String],
    extra: Option<(&str, &str)>,
    value: f64,
) {
    out.push_str(name);
    write_labels(out, names, values, extra);
    let _ = writeln!(out, " {}", fmt_value(value));
}
