//! Error types for props-core

/// Result type for props-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while invoking accessors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No accessor with this signature is declared on the schema
    #[error("Unknown accessor: {signature}")]
    UnknownMethod { signature: String },

    /// A delegate target was asked to run a method it does not provide
    #[error("Delegate does not support {signature}")]
    UnsupportedDelegate { signature: String },

    /// The decryptor rejected the stored value
    #[error("Decryption failed for '{method}': {message}")]
    Decryption { method: String, message: String },

    /// No decryptor registered under this name
    #[error("No decryptor registered under '{name}'")]
    UnknownDecryptor { name: String },

    /// No preprocessor registered under this name
    #[error("No preprocessor registered under '{name}'")]
    UnknownPreprocessor { name: String },

    /// The property source failed to (re)load
    #[error("Reload failed: {message}")]
    Reload { message: String },

    // Transparent wrappers for underlying crate errors
    /// Conversion error from props-convert
    #[error(transparent)]
    Conversion(#[from] props_convert::Error),

    /// Typed extraction error from props-meta
    #[error(transparent)]
    Value(#[from] props_meta::ValueError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
