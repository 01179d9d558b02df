use crate::error::ConfigError;
use analytics::AnalysisParams;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section may be omitted; missing values fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub logging: LogSettings,
}

impl Settings {
    /// Rejects values the analytics engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis
            .to_params()
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Parameters for a full analysis run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// |z-score| above which a sample is reported as an anomaly.
    pub anomaly_threshold: f64,
    /// Largest lead/lag, in samples, tried between two stations.
    pub max_lag: usize,
    /// Trailing window for the rolling standard deviation.
    pub rolling_window: usize,
}

impl AnalysisSettings {
    pub fn to_params(&self) -> AnalysisParams {
        AnalysisParams {
            anomaly_threshold: self.anomaly_threshold,
            max_lag: self.max_lag,
            rolling_window: self.rolling_window,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        let params = AnalysisParams::default();
        Self {
            anomaly_threshold: params.anomaly_threshold,
            max_lag: params.max_lag,
            rolling_window: params.rolling_window,
        }
    }
}

impl From<AnalysisSettings> for AnalysisParams {
    fn from(settings: AnalysisSettings) -> Self {
        settings.to_params()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// An `EnvFilter` directive such as `info` or `analytics=debug`. `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs go to a daily-rolling file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_config;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_match_engine_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.analysis.to_params(), AnalysisParams::default());
        assert_eq!(settings.logging.level, "info");
        assert!(settings.logging.directory.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
            [analysis]
            max_lag = 3

            [logging]
            format = "compact"
            "#,
        );
        let settings = load_config(Some(file.path())).unwrap();

        assert_eq!(settings.analysis.max_lag, 3);
        assert_eq!(settings.analysis.anomaly_threshold, 2.0);
        assert_eq!(settings.analysis.rolling_window, 3);
        assert_eq!(settings.logging.format, LogFormat::Compact);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let file = write_config(
            r#"
            [analysis]
            rolling_window = 0
            "#,
        );
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let file = write_config(
            r#"
            [analysis]
            anomaly_threshold = -0.5
            "#,
        );
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            load_config(Some(&missing)),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_a_load_error() {
        let file = write_config("[analysis\nmax_lag = ");
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::LoadError(_))
        ));
    }
}
