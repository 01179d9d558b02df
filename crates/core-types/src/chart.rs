use crate::error::CoreError;
use crate::series::Series;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A value on a chart's x axis. The backend sends hours as numbers and station ids or bins as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Text(String),
}

/// Optional provenance attached to each standardized series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    #[serde(default)]
    pub station_id: Option<u64>,
    #[serde(default)]
    pub derived: bool,
    #[serde(default)]
    pub aggregation: Option<String>,
    #[serde(default)]
    pub value_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedSeries {
    pub id: String,
    pub label: String,
    pub values: Vec<f64>,
    #[serde(default)]
    pub metadata: SeriesMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxis {
    pub values: Vec<AxisValue>,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub axis_type: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub x: XAxis,
    pub series: Vec<StandardizedSeries>,
}

/// The current chart shape produced by the simulation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedChart {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub format: Option<String>,
    pub data: ChartData,
    /// Free-form rendering hints and context (title, time range, stations...).
    #[serde(default)]
    pub context: Value,
}

/// The older chart shape: one array per series key, where missing samples are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyChart {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub format: Option<String>,
    pub x: Vec<AxisValue>,
    pub series: BTreeMap<String, Vec<Option<f64>>>,
    #[serde(default)]
    pub meta: Value,
}

/// Any chart payload the backend may return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackendChart {
    Standardized(StandardizedChart),
    Legacy(LegacyChart),
}

impl BackendChart {
    /// Parses a chart payload, accepting either shape.
    pub fn from_json(payload: &str) -> Result<Self, CoreError> {
        let chart = serde_json::from_str(payload)?;
        Ok(chart)
    }

    pub fn id(&self) -> &str {
        match self {
            BackendChart::Standardized(chart) => &chart.id,
            BackendChart::Legacy(chart) => &chart.id,
        }
    }

    /// Flattens the payload into strict `Series` values.
    ///
    /// Legacy series come out in key order with `null` samples read as zero.
    pub fn into_series(self) -> Vec<Series> {
        match self {
            BackendChart::Standardized(chart) => chart
                .data
                .series
                .into_iter()
                .map(|s| Series::new(s.id, s.values).with_label(s.label))
                .collect(),
            BackendChart::Legacy(chart) => chart
                .series
                .into_iter()
                .map(|(key, samples)| {
                    let missing = samples.iter().filter(|v| v.is_none()).count();
                    if missing > 0 {
                        tracing::debug!(series = %key, missing, "Legacy series has null samples, reading them as zero.");
                    }
                    let values = samples.into_iter().map(|v| v.unwrap_or(0.0)).collect();
                    Series::new(key, values)
                })
                .collect(),
        }
    }
}
