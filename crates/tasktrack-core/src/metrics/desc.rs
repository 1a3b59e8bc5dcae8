use super::MetricsError;

/// Immutable identity of an instrument: name, help text and ordered label names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desc {
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
}

impl Desc {
    pub fn new(name: &str, help: &str, label_names: &[&str]) -> Result<Self, MetricsError> {
        if !is_metric_name(name) {
            return Err(MetricsError::InvalidName(name.to_string()));
        }
        let mut seen: Vec<&str> = Vec::with_capacity(label_names.len());
        for l in label_names {
            if !is_label_name(l) || seen.contains(l) {
                return Err(MetricsError::InvalidName(format!("{name}: label {l:?}")));
            }
            seen.push(l);
        }
        Ok(Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Build the series key for a label-value tuple, enforcing arity.
    pub(crate) fn key(&self, values: &[&str]) -> Result<Vec<String>, MetricsError> {
        if values.len() != self.label_names.len() {
            return Err(MetricsError::LabelArity {
                name: self.name.clone(),
                expected: self.label_names.len(),
                got: values.len(),
            });
        }
        Ok(values.iter().map(|v| v.to_string()).collect())
    }
}

fn is_metric_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

// `__` is reserved for scraper-internal labels.
fn is_label_name(s: &str) -> bool {
    if s.starts_with("__") {
        return false;
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
