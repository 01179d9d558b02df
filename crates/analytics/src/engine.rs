use crate::error::AnalyticsError;
use crate::report::{
    AnalysisReport, PerformanceMetric, RankedSeriesStats, RollingMetrics, SeriesStats,
    VolatilityChartSeries,
};
use crate::stats::{self, DEFAULT_MAX_LAG};
use core_types::Series;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tunables for a full analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// |z-score| above which a sample is an anomaly.
    pub anomaly_threshold: f64,
    /// Largest shift tried when looking for lead/lag between two stations.
    pub max_lag: usize,
    /// Trailing window for the rolling standard deviation.
    pub rolling_window: usize,
}

impl AnalysisParams {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !self.anomaly_threshold.is_finite() || self.anomaly_threshold < 0.0 {
            return Err(AnalyticsError::InvalidParameter {
                name: "anomaly_threshold",
                reason: format!("must be a finite, non-negative number, got {}", self.anomaly_threshold),
            });
        }
        if self.rolling_window == 0 {
            return Err(AnalyticsError::InvalidParameter {
                name: "rolling_window",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AnalysisParams {
    /// The dashboard flags anomalies at |z| > 2.0, tighter than the single-series default.
    fn default() -> Self {
        Self {
            anomaly_threshold: 2.0,
            max_lag: DEFAULT_MAX_LAG,
            rolling_window: 3,
        }
    }
}

/// Runs every statistic over a set of series.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {
    params: AnalysisParams,
}

impl AnalyticsEngine {
    pub fn new(params: AnalysisParams) -> Result<Self, AnalyticsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// The main entry point: derives the full `AnalysisReport` for `series`.
    ///
    /// Per-series records follow input order. Pairwise records cover every pair
    /// `(i, j)` with `i < j`, in input order.
    #[tracing::instrument(name = "analytics_analyze", skip(self, series), fields(series = series.len()))]
    pub fn analyze(&self, series: &[Series]) -> AnalysisReport {
        let mut report = AnalysisReport::new();
        if series.is_empty() {
            tracing::debug!("No series to analyze, returning an empty report.");
            return report;
        }

        self.calculate_per_series(series, &mut report);
        self.calculate_pairwise(series, &mut report);

        report.rankings = rank_by_mean(&report.statistics);
        report.performance_metrics = report.statistics.iter().map(performance).collect();
        report.series = series.to_vec();
        report.has_data = true;

        tracing::info!(
            series = series.len(),
            pairs = report.comparisons.len(),
            anomalies = report.anomalies.iter().map(|a| a.anomalies.len()).sum::<usize>(),
            "Analysis complete."
        );
        report
    }

    fn calculate_per_series(&self, series: &[Series], report: &mut AnalysisReport) {
        for s in series {
            if s.is_empty() {
                tracing::warn!(series = %s.id, "Series has no samples, its metrics will be zero.");
            }

            let volatility = stats::volatility(&s.id, &s.values);
            report.volatility_chart_data.push(VolatilityChartSeries {
                id: s.id.clone(),
                label: s.id.clone(),
                data: volatility.changes.clone(),
            });
            report.volatility.push(volatility);

            report.statistics.push(stats::descriptive_stats(&s.id, &s.values));
            report.anomalies.push(stats::detect_anomalies(
                &s.id,
                &s.values,
                self.params.anomaly_threshold,
            ));
            report.trends.push(stats::trend(&s.id, &s.values));
            report.shapes.push(stats::shape(&s.id, &s.values));
            report.activity.push(stats::activity(&s.id, &s.values));
            report.rolling.push(RollingMetrics {
                station_id: s.id.clone(),
                window: self.params.rolling_window,
                rolling_std_dev: stats::rolling_std_dev(&s.values, self.params.rolling_window),
            });
        }
    }

    fn calculate_pairwise(&self, series: &[Series], report: &mut AnalysisReport) {
        for (i, a) in series.iter().enumerate() {
            for b in &series[i + 1..] {
                tracing::debug!(a = %a.id, b = %b.id, "Comparing stations.");
                report
                    .comparisons
                    .push(stats::compare(&a.id, &a.values, &b.id, &b.values));
                report.lag_comparisons.push(stats::best_lag_correlation(
                    &a.id,
                    &a.values,
                    &b.id,
                    &b.values,
                    self.params.max_lag,
                ));
            }
        }
    }
}

/// Orders statistics by mean, highest first, keeping input order among equals.
fn rank_by_mean(statistics: &[SeriesStats]) -> Vec<RankedSeriesStats> {
    let mut sorted = statistics.to_vec();
    sorted.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, stats)| RankedSeriesStats { stats, rank: i + 1 })
        .collect()
}

fn performance(stats: &SeriesStats) -> PerformanceMetric {
    let capacity = if stats.max == 0.0 {
        0.0
    } else {
        stats.mean / stats.max * 100.0
    };
    PerformanceMetric {
        station: stats.station_id.clone(),
        peak: stats.max,
        average: stats.mean,
        stability: 100.0 - stats.coefficient_of_variation,
        capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stations() -> Vec<Series> {
        vec![
            Series::new("st_low", vec![1.0, 2.0, 1.0, 0.0, 1.0, 2.0]),
            Series::new("st_high", vec![9.0, 8.0, 10.0, 9.0, 30.0, 9.0]).with_label("High street"),
            Series::new("st_mid", vec![5.0, 5.0, 6.0, 4.0, 5.0, 5.0]),
        ]
    }

    #[test]
    fn test_empty_input_has_no_data() {
        let report = AnalyticsEngine::default().analyze(&[]);
        assert!(!report.has_data);
        assert_eq!(report, AnalysisReport::new());
    }

    #[test]
    fn test_per_series_records_follow_input_order() {
        let report = AnalyticsEngine::default().analyze(&stations());

        assert!(report.has_data);
        assert_eq!(report.series.len(), 3);
        let ids: Vec<&str> = report.statistics.iter().map(|s| s.station_id.as_str()).collect();
        assert_eq!(ids, vec!["st_low", "st_high", "st_mid"]);
        for len in [
            report.volatility.len(),
            report.volatility_chart_data.len(),
            report.anomalies.len(),
            report.trends.len(),
            report.shapes.len(),
            report.activity.len(),
            report.rolling.len(),
            report.performance_metrics.len(),
        ] {
            assert_eq!(len, 3);
        }
        assert_eq!(report.volatility_chart_data[1].data, report.volatility[1].changes);
        assert_eq!(report.rolling[0].window, 3);
        assert_eq!(report.rolling[0].rolling_std_dev.len(), 6);
    }

    #[test]
    fn test_pairs_are_unordered_and_in_input_order() {
        let report = AnalyticsEngine::default().analyze(&stations());

        let pairs: Vec<(&str, &str)> = report
            .comparisons
            .iter()
            .map(|c| (c.station_a.as_str(), c.station_b.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("st_low", "st_high"), ("st_low", "st_mid"), ("st_high", "st_mid")]
        );
        assert_eq!(report.lag_comparisons.len(), 3);
        assert_eq!(report.lag_comparisons[2].station_a, "st_high");
    }

    #[test]
    fn test_rankings_by_mean_descending() {
        let report = AnalyticsEngine::default().analyze(&stations());

        let ranked: Vec<(&str, usize)> = report
            .rankings
            .iter()
            .map(|r| (r.stats.station_id.as_str(), r.rank))
            .collect();
        assert_eq!(ranked, vec![("st_high", 1), ("st_mid", 2), ("st_low", 3)]);
    }

    #[test]
    fn test_rankings_keep_input_order_on_ties() {
        let series = vec![Series::new("a", vec![2.0, 4.0]), Series::new("b", vec![3.0, 3.0])];
        let report = AnalyticsEngine::default().analyze(&series);
        assert_eq!(report.rankings[0].stats.station_id, "a");
        assert_eq!(report.rankings[1].stats.station_id, "b");
    }

    #[test]
    fn test_default_threshold_is_tighter() {
        // The spike at hour 4 sits at z ~ 2.2: flagged at 2.0, not at 2.5.
        let report = AnalyticsEngine::default().analyze(&stations());
        let high = &report.anomalies[1];
        assert_eq!(high.anomalies.len(), 1);
        assert_eq!(high.anomalies[0].index, 4);

        let strict = AnalyticsEngine::new(AnalysisParams {
            anomaly_threshold: stats::DEFAULT_ANOMALY_THRESHOLD,
            ..AnalysisParams::default()
        })
        .unwrap()
        .analyze(&stations());
        assert!(strict.anomalies[1].anomalies.is_empty());
    }

    #[test]
    fn test_performance_metrics() {
        let report = AnalyticsEngine::default().analyze(&stations());
        let mid = &report.performance_metrics[2];
        let stats = &report.statistics[2];

        assert_eq!(mid.station, "st_mid");
        assert_eq!(mid.peak, 6.0);
        assert_eq!(mid.average, 5.0);
        assert!((mid.stability - (100.0 - stats.coefficient_of_variation)).abs() < 1e-9);
        assert!((mid.capacity - 5.0 / 6.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_idle_station_capacity_is_zero() {
        let report = AnalyticsEngine::default().analyze(&[Series::new("idle", vec![0.0; 24])]);
        let perf = &report.performance_metrics[0];
        assert_eq!(perf.capacity, 0.0);
        assert_eq!(perf.stability, 100.0);
        assert_eq!(report.activity[0].non_zero_ratio, 0.0);
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let negative = AnalysisParams {
            anomaly_threshold: -1.0,
            ..AnalysisParams::default()
        };
        assert!(matches!(
            AnalyticsEngine::new(negative),
            Err(AnalyticsError::InvalidParameter { name: "anomaly_threshold", .. })
        ));

        let no_window = AnalysisParams {
            rolling_window: 0,
            ..AnalysisParams::default()
        };
        assert!(matches!(
            AnalyticsEngine::new(no_window),
            Err(AnalyticsError::InvalidParameter { name: "rolling_window", .. })
        ));

        assert!(AnalyticsEngine::new(AnalysisParams {
            anomaly_threshold: f64::NAN,
            ..AnalysisParams::default()
        })
        .is_err());
    }

    #[test]
    fn test_report_serializes_flat_rankings() {
        let report = AnalyticsEngine::default().analyze(&stations());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["has_data"], true);
        assert_eq!(json["rankings"][0]["station_id"], "st_high");
        assert_eq!(json["rankings"][0]["rank"], 1);
        assert_eq!(json["anomalies"][1]["anomalies"][0]["kind"], "high");
    }
}
