//! Error types for props-text

use props_meta::ArgKind;

/// Result type for formatting operations
pub type Result<T> = std::result::Result<T, FormatError>;

/// Reasons a template cannot be rendered against its arguments
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The character after `%` is not a known conversion
    #[error("Unknown format conversion '{conversion}' at byte {position}")]
    UnknownConversion { conversion: String, position: usize },

    /// A specifier refers past the end of the argument list
    #[error("Format specifier '{specifier}' has no matching argument")]
    MissingArgument { specifier: String },

    /// The conversion does not accept the argument's kind
    #[error("Conversion '{conversion}' cannot format a {kind} argument")]
    IllegalConversion { conversion: char, kind: ArgKind },

    /// `-` or `0` flag given without a width
    #[error("Format specifier '{specifier}' requires a width")]
    MissingWidth { specifier: String },

    /// Width or precision is not a number or exceeds the padding limit
    #[error("Format specifier '{specifier}' has an invalid width or precision")]
    InvalidWidth { specifier: String },

    /// Precision given to a conversion that does not take one
    #[error("Conversion '{conversion}' does not accept a precision")]
    IllegalPrecision { conversion: char },

    /// A flag is not valid for the conversion
    #[error("Flags '{flags}' are not valid for conversion '{conversion}'")]
    IllegalFlags { flags: String, conversion: char },

    /// An integer passed to `%c` is not a Unicode scalar value
    #[error("{value} is not a valid code point")]
    IllegalCodePoint { value: String },

    /// Explicit argument index `0$` or a `<` with no previous argument
    #[error("Invalid argument index in '{specifier}'")]
    InvalidIndex { specifier: String },
}
