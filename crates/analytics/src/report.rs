use core_types::{AnomalyKind, Series};
use serde::{Deserialize, Serialize};

/// Descriptive statistics for one series.
///
/// Variance and standard deviation are population figures (divided by `n`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub station_id: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub variance: f64,
    pub range: f64,
    /// `std_dev / mean * 100`, or 0 when the mean is 0.
    pub coefficient_of_variation: f64,
    /// First index holding the maximum.
    pub peak_index: usize,
    /// First index holding the minimum.
    pub valley_index: usize,
    pub total: f64,
}

impl SeriesStats {
    /// A zeroed record, used for an empty series.
    pub fn empty(station_id: &str) -> Self {
        Self {
            station_id: station_id.to_string(),
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            variance: 0.0,
            range: 0.0,
            coefficient_of_variation: 0.0,
            peak_index: 0,
            valley_index: 0,
            total: 0.0,
        }
    }
}

/// `SeriesStats` with its position when all series are ordered by mean, highest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSeriesStats {
    #[serde(flatten)]
    pub stats: SeriesStats,
    /// 1-based.
    pub rank: usize,
}

/// How two series relate over their common prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub station_a: String,
    pub station_b: String,
    pub correlation: f64,
    /// Signed: `mean(a) - mean(b)`.
    pub mean_difference: f64,
    pub max_divergence: f64,
    pub max_divergence_index: usize,
}

/// Step-to-step movement of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityMetrics {
    pub station_id: String,
    /// `changes[i] = values[i + 1] - values[i]`.
    pub changes: Vec<f64>,
    pub max_increase: f64,
    /// Index of the later sample of the largest increase.
    pub max_increase_index: usize,
    pub max_decrease: f64,
    /// Index of the later sample of the largest decrease.
    pub max_decrease_index: usize,
    pub avg_volatility: f64,
}

impl VolatilityMetrics {
    pub fn empty(station_id: &str) -> Self {
        Self {
            station_id: station_id.to_string(),
            changes: Vec::new(),
            max_increase: 0.0,
            max_increase_index: 0,
            max_decrease: 0.0,
            max_decrease_index: 0,
            avg_volatility: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub index: usize,
    pub value: f64,
    pub z_score: f64,
    pub kind: AnomalyKind,
}

/// Samples whose z-score exceeds the threshold, in index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyDetection {
    pub station_id: String,
    pub anomalies: Vec<Anomaly>,
}

/// Least-squares line through `(index, value)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendMetrics {
    pub station_id: String,
    /// Change per index step.
    pub slope: f64,
    pub intercept: f64,
    /// Within `[0, 1]`.
    pub r2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeMetrics {
    pub station_id: String,
    pub skewness: f64,
    /// Excess kurtosis (a normal distribution scores 0).
    pub kurtosis: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    pub station_id: String,
    pub zero_count: usize,
    pub non_zero_count: usize,
    pub non_zero_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingMetrics {
    pub station_id: String,
    pub window: usize,
    /// Aligned to the input index.
    pub rolling_std_dev: Vec<f64>,
}

/// The shift between two series that correlates best.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagCorrelation {
    pub station_a: String,
    pub station_b: String,
    /// Positive when `station_a` leads `station_b`.
    pub best_lag: isize,
    pub best_correlation: f64,
}

/// A station's headline figures, derived from its `SeriesStats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub station: String,
    pub peak: f64,
    pub average: f64,
    /// `100 - coefficient_of_variation`.
    pub stability: f64,
    /// `mean / max * 100`, or 0 when the max is 0.
    pub capacity: f64,
}

/// A volatility change list shaped for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityChartSeries {
    pub id: String,
    pub label: String,
    pub data: Vec<f64>,
}

/// Everything the `AnalyticsEngine` derives from one set of series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub series: Vec<Series>,
    pub statistics: Vec<SeriesStats>,
    pub rankings: Vec<RankedSeriesStats>,
    pub comparisons: Vec<ComparisonMetrics>,
    pub volatility: Vec<VolatilityMetrics>,
    pub volatility_chart_data: Vec<VolatilityChartSeries>,
    pub anomalies: Vec<AnomalyDetection>,
    pub performance_metrics: Vec<PerformanceMetric>,
    pub trends: Vec<TrendMetrics>,
    pub shapes: Vec<ShapeMetrics>,
    pub activity: Vec<ActivityMetrics>,
    pub rolling: Vec<RollingMetrics>,
    pub lag_comparisons: Vec<LagCorrelation>,
    pub has_data: bool,
}

impl AnalysisReport {
    /// An empty report, with `has_data` unset.
    pub fn new() -> Self {
        Self {
            series: Vec::new(),
            statistics: Vec::new(),
            rankings: Vec::new(),
            comparisons: Vec::new(),
            volatility: Vec::new(),
            volatility_chart_data: Vec::new(),
            anomalies: Vec::new(),
            performance_metrics: Vec::new(),
            trends: Vec::new(),
            shapes: Vec::new(),
            activity: Vec::new(),
            rolling: Vec::new(),
            lag_comparisons: Vec::new(),
            has_data: false,
        }
    }
}

impl Default for AnalysisReport {
    fn default() -> Self {
        Self::new()
    }
}
