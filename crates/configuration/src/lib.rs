use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_logging;
pub use settings::{AnalysisSettings, LogFormat, LogSettings, Settings};

/// The file read when no explicit path is given. It is optional.
pub const DEFAULT_CONFIG_FILE: &str = "bikesim.toml";

/// Prefix for environment overrides, e.g. `BIKESIM__ANALYSIS__MAX_LAG=8`.
pub const ENV_PREFIX: &str = "BIKESIM";

/// Loads and validates the application settings.
///
/// Sources, lowest priority first: built-in defaults, the TOML file, then `BIKESIM__*`
/// environment variables. An explicit `path` must exist; the default file may be absent.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    load_with_environment(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn load_with_environment(
    path: Option<&Path>,
    environment: config::Environment,
) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            config::File::from(path).required(true)
        }
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(?settings, "Configuration loaded.");
    Ok(settings)
}
