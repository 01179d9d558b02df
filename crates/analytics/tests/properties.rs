use analytics::stats::{
    activity, correlation, descriptive_stats, detect_anomalies, rolling_std_dev, shape, trend,
    volatility,
};
use analytics::{AnalysisParams, AnalyticsEngine};
use core_types::Series;
use proptest::prelude::*;

fn hourly() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-500.0..500.0f64, 0..48)
}

fn paired() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (2usize..48).prop_flat_map(|n| {
        (
            prop::collection::vec(-500.0..500.0f64, n),
            prop::collection::vec(-500.0..500.0f64, n),
        )
    })
}

proptest! {
    #[test]
    fn stats_are_deterministic(values in hourly()) {
        let first = descriptive_stats("st", &values);
        let second = descriptive_stats("st", &values);
        prop_assert_eq!(first.mean.to_bits(), second.mean.to_bits());
        prop_assert_eq!(first.std_dev.to_bits(), second.std_dev.to_bits());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn constant_series_has_no_spread(c in -100.0..100.0f64, n in 1usize..48) {
        let stats = descriptive_stats("st", &vec![c; n]);
        prop_assert!((stats.mean - c).abs() < 1e-9);
        prop_assert!(stats.std_dev < 1e-9);
        prop_assert_eq!(stats.range, 0.0);
    }

    #[test]
    fn correlation_is_symmetric_and_bounded((a, b) in paired()) {
        let ab = correlation(&a, &b);
        let ba = correlation(&b, &a);
        prop_assert_eq!(ab, ba);
        prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&ab));
    }

    #[test]
    fn self_correlation_is_one(values in prop::collection::vec(-500.0..500.0f64, 2..48)) {
        let stats = descriptive_stats("st", &values);
        prop_assume!(stats.std_dev > 1e-6);
        prop_assert!((correlation(&values, &values) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn volatility_has_one_change_per_step(values in hourly()) {
        let metrics = volatility("st", &values);
        prop_assert_eq!(metrics.changes.len(), values.len().saturating_sub(1));
        prop_assert!(metrics.avg_volatility >= 0.0);
    }

    #[test]
    fn degenerate_inputs_stay_finite(values in prop::collection::vec(-500.0..500.0f64, 0..2)) {
        let stats = descriptive_stats("st", &values);
        prop_assert!(stats.mean.is_finite() && stats.coefficient_of_variation.is_finite());
        prop_assert!(detect_anomalies("st", &values, 2.5).anomalies.is_empty());
        let fit = trend("st", &values);
        prop_assert_eq!((fit.slope, fit.r2), (0.0, 0.0));
        let moments = shape("st", &values);
        prop_assert_eq!((moments.skewness, moments.kurtosis), (0.0, 0.0));
        prop_assert!(activity("st", &values).non_zero_ratio <= 1.0);
    }

    #[test]
    fn r2_stays_in_unit_interval(values in hourly()) {
        let fit = trend("st", &values);
        prop_assert!((0.0..=1.0).contains(&fit.r2));
    }

    #[test]
    fn rolling_std_dev_is_aligned(values in hourly(), window in 0usize..10) {
        let rolled = rolling_std_dev(&values, window);
        prop_assert_eq!(rolled.len(), values.len());
        if let Some(first) = rolled.first() {
            prop_assert_eq!(*first, 0.0);
        }
        prop_assert!(rolled.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn engine_covers_every_pair(count in 0usize..6, values in hourly()) {
        let series: Vec<Series> = (0..count)
            .map(|i| Series::new(format!("st_{i}"), values.iter().map(|v| v + i as f64).collect()))
            .collect();
        let report = AnalyticsEngine::new(AnalysisParams::default()).unwrap().analyze(&series);

        prop_assert_eq!(report.has_data, count > 0);
        prop_assert_eq!(report.comparisons.len(), count * count.saturating_sub(1) / 2);
        prop_assert_eq!(report.lag_comparisons.len(), report.comparisons.len());
        let ranks: Vec<usize> = report.rankings.iter().map(|r| r.rank).collect();
        prop_assert_eq!(ranks, (1..=count).collect::<Vec<_>>());
        prop_assert!(report.rankings.windows(2).all(|w| w[0].stats.mean >= w[1].stats.mean));
    }
}
