use thiserror::Error;

/// Errors raised while loading or validating sync settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A required variable is unset or blank.
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be used.
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    /// The `.env` file could not be read or parsed.
    #[error("{0}")]
    EnvFile(String),
}
