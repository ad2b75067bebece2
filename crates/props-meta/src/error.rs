//! Error types for props-meta

/// Result type for typed value extraction
pub type Result<T> = std::result::Result<T, ValueError>;

/// Errors raised when a [`crate::Value`] cannot become the requested Rust type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// The value holds a different variant than the one requested
    #[error("Expected {expected} but found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The value is numeric but does not fit the requested width
    #[error("Value {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
}
