use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the mean an anomalous sample falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    High,
    Low,
}

impl AnomalyKind {
    /// Classifies a z-score. Zero is never flagged in practice, but maps to `Low`.
    pub fn from_z_score(z_score: f64) -> Self {
        if z_score > 0.0 {
            AnomalyKind::High
        } else {
            AnomalyKind::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::High => "high",
            AnomalyKind::Low => "low",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_z_score() {
        assert_eq!(AnomalyKind::from_z_score(3.1), AnomalyKind::High);
        assert_eq!(AnomalyKind::from_z_score(-2.7), AnomalyKind::Low);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&AnomalyKind::High).unwrap();
        assert_eq!(json, "\"high\"");
        let parsed: AnomalyKind = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, AnomalyKind::Low);
    }
}
