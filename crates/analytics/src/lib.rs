//! # Station Analytics Engine
//!
//! Statistical summaries for the per-station time series produced by the bike-sharing
//! simulation backend.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of files, networks or the UI. It depends
//!   only on `core-types`.
//! - **Neutral Results:** Every function in [`stats`] accepts any finite input, including
//!   empty or constant series, and returns a well-formed record with zeros where a value
//!   is undefined. Nothing here returns `NaN` or panics on degenerate data.
//! - **Stateless Calculation:** `AnalyticsEngine` only holds its parameters. The same
//!   input always yields the same `AnalysisReport`.
//!
//! ## Public API
//!
//! - [`stats`]: the individual statistics, as free functions.
//! - `AnalyticsEngine`: runs every statistic over a set of series.
//! - `AnalysisReport` and the metric records in [`report`].
//! - `AnalyticsError`: invalid engine parameters.

pub mod engine;
pub mod error;
pub mod report;
pub mod stats;

pub use engine::{AnalysisParams, AnalyticsEngine};
pub use error::AnalyticsError;
pub use report::{
    ActivityMetrics, AnalysisReport, Anomaly, AnomalyDetection, ComparisonMetrics,
    LagCorrelation, PerformanceMetric, RankedSeriesStats, RollingMetrics, SeriesStats,
    ShapeMetrics, TrendMetrics, VolatilityChartSeries, VolatilityMetrics,
};
