//! The measurement value type.

/// Measurement semantics of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
    /// Cumulative value as reported by rsyslog. Monotonicity is not enforced.
    Counter,
    /// Point-in-time value.
    Gauge,
}

/// One named measurement with at most one label dimension.
///
/// An empty `label_value` means the point carries no label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    /// Metric name without the exporter namespace.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Counter or gauge.
    pub kind: PointKind,
    /// Latest reported value.
    pub value: i64,
    /// Label name, empty when unlabeled.
    pub label_name: String,
    /// Label value, empty when unlabeled.
    pub label_value: String,
}

impl Point {
    /// Creates an unlabeled counter point.
    pub fn counter(name: impl Into<String>, description: impl Into<String>, value: i64) -> Self {
        Self::new(name, description, PointKind::Counter, value)
    }

    /// Creates an unlabeled gauge point.
    pub fn gauge(name: impl Into<String>, description: impl Into<String>, value: i64) -> Self {
        Self::new(name, description, PointKind::Gauge, value)
    }

    fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: PointKind,
        value: i64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            value,
            label_name: String::new(),
            label_value: String::new(),
        }
    }

    /// Attaches the single label dimension.
    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.label_name = name.into();
        self.label_value = value.into();
        self
    }

    /// Store key: `name` alone, or `name.label_value` when labeled.
    pub fn key(&self) -> String {
        if self.label_value.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.label_value)
        }
    }

    /// Returns the label pair if the point is labeled.
    pub fn label(&self) -> Option<(&str, &str)> {
        if self.label_value.is_empty() {
            None
        } else {
            Some((&self.label_name, &self.label_value))
        }
    }
}
