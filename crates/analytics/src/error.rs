use thiserror::Error;

/// Errors raised while setting up an analysis.
///
/// The statistics themselves never fail: degenerate input yields zeroed records.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid analysis parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
