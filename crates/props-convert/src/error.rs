//! Error types for props-convert

/// Result type for conversions
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while converting a property string
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The string cannot be represented as the target type
    #[error("Cannot convert '{value}' to {target} for '{method}': {reason}")]
    Conversion {
        method: String,
        target: String,
        value: String,
        reason: String,
    },

    /// No converter is registered under the requested name
    #[error("No converter registered under '{name}'")]
    UnknownConverter { name: String },
}
