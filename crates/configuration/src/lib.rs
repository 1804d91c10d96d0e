use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    AbcThresholds, AnalysisConfig, MaxQtyFactors, PlanningParams, SafetyStockFactors,
    XyzThresholds, ZoningParams,
};

/// Loads the analysis configuration, overlaying an optional TOML file on the
/// built-in defaults.
///
/// With `path = None` a `pickwise.toml` next to the working directory is
/// picked up when present; a missing file simply means defaults. The result
/// is validated before it is handed out, so a successful return is safe to
/// feed into the engine.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, ConfigError> {
    let mut builder = config::Config::builder();

    builder = match path {
        Some(path) => builder.add_source(config::File::from(path)),
        None => builder.add_source(config::File::with_name("pickwise").required(false)),
    };

    // Attempt to deserialize the entire configuration into our `AnalysisConfig` struct
    let config = builder.build()?.try_deserialize::<AnalysisConfig>()?;

    config.validate()?;
    Ok(config)
}
