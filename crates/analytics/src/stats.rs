//! Statistics over a single series or a pair of series.
//!
//! All moments are population moments (divided by `n`). Where a statistic is undefined
//! for the input (empty series, zero variance, too few samples) the function returns 0
//! in its place.

use crate::report::{
    ActivityMetrics, Anomaly, AnomalyDetection, ComparisonMetrics, LagCorrelation,
    SeriesStats, ShapeMetrics, TrendMetrics, VolatilityMetrics,
};
use core_types::AnomalyKind;

/// |z-score| above which a sample is reported as an anomaly.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.5;

/// Largest shift, in samples, tried by [`best_lag_correlation`].
pub const DEFAULT_MAX_LAG: usize = 6;

/// Lags whose overlap is this short or shorter are not scored.
const MIN_LAG_OVERLAP: usize = 2;

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

fn population_std_dev(values: &[f64]) -> f64 {
    population_variance(values, mean(values)).sqrt()
}

/// Returns the first index holding `target`, or 0.
fn first_index_of(values: &[f64], target: f64) -> usize {
    values.iter().position(|&v| v == target).unwrap_or(0)
}

/// Min, max, mean, median, spread and the positions of the extremes.
///
/// An empty series yields [`SeriesStats::empty`].
pub fn descriptive_stats(label: &str, values: &[f64]) -> SeriesStats {
    if values.is_empty() {
        return SeriesStats::empty(label);
    }

    let n = values.len();
    let total: f64 = values.iter().sum();
    let mean = total / n as f64;
    let variance = population_variance(values, mean);
    let std_dev = variance.sqrt();

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let coefficient_of_variation = if mean == 0.0 {
        0.0
    } else {
        std_dev / mean * 100.0
    };

    SeriesStats {
        station_id: label.to_string(),
        min,
        max,
        mean,
        median,
        std_dev,
        variance,
        range: max - min,
        coefficient_of_variation,
        peak_index: first_index_of(values, max),
        valley_index: first_index_of(values, min),
        total,
    }
}

/// Pearson correlation over the common prefix of `a` and `b`.
///
/// Returns 0 when fewer than two samples overlap or either side is constant.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n <= 1 {
        return 0.0;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let (mean_a, mean_b) = (mean(a), mean(b));

    let mut numerator = 0.0;
    let mut sum_sq_a = 0.0;
    let mut sum_sq_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        numerator += dx * dy;
        sum_sq_a += dx * dx;
        sum_sq_b += dy * dy;
    }

    let denominator = (sum_sq_a * sum_sq_b).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Correlation, mean difference and the widest pointwise gap between two series.
///
/// Both series are cut to their common length first.
pub fn compare(label_a: &str, a: &[f64], label_b: &str, b: &[f64]) -> ComparisonMetrics {
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);

    let differences: Vec<f64> = a.iter().zip(b).map(|(x, y)| (x - y).abs()).collect();
    let max_divergence = differences.iter().copied().fold(0.0, f64::max);

    ComparisonMetrics {
        station_a: label_a.to_string(),
        station_b: label_b.to_string(),
        correlation: correlation(a, b),
        mean_difference: mean(a) - mean(b),
        max_divergence,
        max_divergence_index: first_index_of(&differences, max_divergence),
    }
}

/// First differences of a series and their extremes.
///
/// The extreme indices point at the later of the two samples, so a jump between
/// hour 3 and hour 4 is reported at 4. Fewer than two samples yields
/// [`VolatilityMetrics::empty`].
pub fn volatility(label: &str, values: &[f64]) -> VolatilityMetrics {
    if values.len() < 2 {
        return VolatilityMetrics::empty(label);
    }

    let changes: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let max_increase = changes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_decrease = changes.iter().copied().fold(f64::INFINITY, f64::min);
    let avg_volatility = changes.iter().map(|c| c.abs()).sum::<f64>() / changes.len() as f64;

    VolatilityMetrics {
        station_id: label.to_string(),
        max_increase,
        max_increase_index: first_index_of(&changes, max_increase) + 1,
        max_decrease,
        max_decrease_index: first_index_of(&changes, max_decrease) + 1,
        avg_volatility,
        changes,
    }
}

/// Flags every sample whose |z-score| is strictly above `threshold`.
///
/// A constant or empty series has no anomalies.
pub fn detect_anomalies(label: &str, values: &[f64], threshold: f64) -> AnomalyDetection {
    let mut detection = AnomalyDetection {
        station_id: label.to_string(),
        anomalies: Vec::new(),
    };

    let mean = mean(values);
    let std_dev = population_variance(values, mean).sqrt();
    if values.is_empty() || std_dev == 0.0 {
        return detection;
    }

    detection.anomalies = values
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            let z_score = (value - mean) / std_dev;
            (z_score.abs() > threshold).then(|| Anomaly {
                index,
                value,
                z_score,
                kind: AnomalyKind::from_z_score(z_score),
            })
        })
        .collect();

    detection
}

/// Ordinary least squares of value against index.
pub fn trend(label: &str, values: &[f64]) -> TrendMetrics {
    if values.len() < 2 {
        return TrendMetrics {
            station_id: label.to_string(),
            slope: 0.0,
            intercept: values.first().copied().unwrap_or(0.0),
            r2: 0.0,
        };
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(values);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    let intercept = y_mean - slope * x_mean;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, y) in values.iter().enumerate() {
        let fitted = intercept + slope * i as f64;
        ss_res += (y - fitted).powi(2);
        ss_tot += (y - y_mean).powi(2);
    }
    let r2 = if ss_tot == 0.0 {
        0.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    TrendMetrics {
        station_id: label.to_string(),
        slope,
        intercept,
        r2,
    }
}

/// Skewness and excess kurtosis from population central moments.
///
/// These are the plain moment ratios, without the small-sample bias corrections.
pub fn shape(label: &str, values: &[f64]) -> ShapeMetrics {
    let mut metrics = ShapeMetrics {
        station_id: label.to_string(),
        skewness: 0.0,
        kurtosis: 0.0,
    };
    if values.len() < 3 {
        return metrics;
    }

    let n = values.len() as f64;
    let mean = mean(values);
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;

    if m2 == 0.0 {
        return metrics;
    }
    metrics.skewness = m3 / m2.powf(1.5);
    metrics.kurtosis = m4 / (m2 * m2) - 3.0;
    metrics
}

/// Counts samples that are exactly zero.
pub fn activity(label: &str, values: &[f64]) -> ActivityMetrics {
    let zero_count = values.iter().filter(|&&v| v == 0.0).count();
    let non_zero_count = values.len() - zero_count;
    let non_zero_ratio = if values.is_empty() {
        0.0
    } else {
        non_zero_count as f64 / values.len() as f64
    };

    ActivityMetrics {
        station_id: label.to_string(),
        zero_count,
        non_zero_count,
        non_zero_ratio,
    }
}

/// Population standard deviation over a trailing window ending at each index.
///
/// The window is truncated at the start of the series, so the first entry is always 0.
/// A `window` of 0 or 1 yields all zeros.
pub fn rolling_std_dev(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return vec![0.0; values.len()];
    }
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            population_std_dev(&values[start..=i])
        })
        .collect()
}

/// Pairs `a[i]` with `b[i + lag]` and returns both aligned slices.
fn aligned<'a>(a: &'a [f64], b: &'a [f64], lag: isize) -> (&'a [f64], &'a [f64]) {
    let shift = lag.unsigned_abs();
    if lag >= 0 {
        let len = a.len().min(b.len().saturating_sub(shift));
        if len == 0 {
            return (&[], &[]);
        }
        (&a[..len], &b[shift..shift + len])
    } else {
        let len = a.len().saturating_sub(shift).min(b.len());
        if len == 0 {
            return (&[], &[]);
        }
        (&a[shift..shift + len], &b[..len])
    }
}

/// Finds the shift of `b` against `a` within `±max_lag` that correlates best.
///
/// A positive lag means `b` trails `a`: if `b[i] = a[i - 2]` the best lag is `+2`.
/// Ties keep the most negative lag. If no lag overlaps by more than two samples the
/// result is lag 0 with correlation 0.
pub fn best_lag_correlation(
    label_a: &str,
    a: &[f64],
    label_b: &str,
    b: &[f64],
    max_lag: usize,
) -> LagCorrelation {
    // Shifts past the longer series never overlap.
    let max_lag = max_lag.min(a.len().max(b.len())) as isize;
    let mut best_lag = 0;
    let mut best_correlation = f64::NEG_INFINITY;

    for lag in -max_lag..=max_lag {
        let (xs, ys) = aligned(a, b, lag);
        if xs.len() <= MIN_LAG_OVERLAP {
            continue;
        }
        let r = correlation(xs, ys);
        if r > best_correlation {
            best_correlation = r;
            best_lag = lag;
        }
    }

    if best_correlation == f64::NEG_INFINITY {
        best_lag = 0;
        best_correlation = 0.0;
    }

    LagCorrelation {
        station_a: label_a.to_string(),
        station_b: label_b.to_string(),
        best_lag,
        best_correlation,
    }
}
