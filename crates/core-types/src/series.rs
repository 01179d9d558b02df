use serde::{Deserialize, Serialize};

/// A named, ordered run of samples, conventionally one per hour of a day for a single station.
///
/// This is the only input shape the analytics engine accepts. Anything looser (optional
/// fields, `null` samples) is resolved by the chart adapter before a `Series` is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub label: String,
    pub values: Vec<f64>,
}

impl Series {
    /// Creates a series whose label is its id.
    pub fn new(id: impl Into<String>, values: Vec<f64>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            values,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
