use thiserror::Error;

/// Top-level error type for the Hopper system.
///
/// Each variant covers one failure class. Capability failures (`Motor`,
/// `Classifier`) and classifier contract violations (`Classification`) are
/// recoverable within a feed cycle; `Config` errors are fatal at
/// construction time.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HopperError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Motor error: {0}")]
    Motor(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Classification contract violation: {0}")]
    Classification(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("State error: {0}")]
    State(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HopperError {
    /// A `Config` error for a missing required reference field, phrased the
    /// way the host expects it (`required field missing: <field>`).
    pub fn required_field(field: &str) -> Self {
        HopperError::Config(format!("required field missing: {}", field))
    }
}

impl From<toml::de::Error> for HopperError {
    fn from(err: toml::de::Error) -> Self {
        HopperError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HopperError {
    fn from(err: toml::ser::Error) -> Self {
        HopperError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HopperError {
    fn from(err: serde_json::Error) -> Self {
        HopperError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Hopper operations.
pub type Result<T> = std::result::Result<T, HopperError>;
