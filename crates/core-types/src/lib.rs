pub mod chart;
pub mod enums;
pub mod error;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use chart::{BackendChart, LegacyChart, StandardizedChart};
pub use enums::AnomalyKind;
pub use error::CoreError;
pub use series::Series;
