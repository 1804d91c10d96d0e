use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid value for `{parameter}`: {reason}")]
    Invalid { parameter: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(parameter: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}
