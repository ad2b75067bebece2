//! Declared return types of accessors

use std::fmt;

/// The type an accessor declares it returns.
///
/// The converter turns the resolved property string into a [`crate::Value`]
/// shaped by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Path,
    Duration,
    /// One of a closed set of variant names, matched exactly
    Enum(Vec<String>),
    /// A separator-delimited list of the element type
    List(Box<TargetType>),
    /// A type handled by a converter registered under this name
    Custom(String),
}

impl TargetType {
    /// Shorthand for `TargetType::List(Box::new(element))`.
    pub fn list(element: TargetType) -> Self {
        TargetType::List(Box::new(element))
    }

    /// Shorthand for an enum over the given variant names.
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TargetType::Enum(variants.into_iter().map(Into::into).collect())
    }

    /// Whether this is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            TargetType::I8
                | TargetType::I16
                | TargetType::I32
                | TargetType::I64
                | TargetType::U8
                | TargetType::U16
                | TargetType::U32
                | TargetType::U64
        )
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Bool => f.write_str("bool"),
            TargetType::Char => f.write_str("char"),
            TargetType::I8 => f.write_str("i8"),
            TargetType::I16 => f.write_str("i16"),
            TargetType::I32 => f.write_str("i32"),
            TargetType::I64 => f.write_str("i64"),
            TargetType::U8 => f.write_str("u8"),
            TargetType::U16 => f.write_str("u16"),
            TargetType::U32 => f.write_str("u32"),
            TargetType::U64 => f.write_str("u64"),
            TargetType::F32 => f.write_str("f32"),
            TargetType::F64 => f.write_str("f64"),
            TargetType::String => f.write_str("string"),
            TargetType::Path => f.write_str("path"),
            TargetType::Duration => f.write_str("duration"),
            TargetType::Enum(variants) => write!(f, "enum[{}]", variants.join("|")),
            TargetType::List(element) => write!(f, "list<{}>", element),
            TargetType::Custom(name) => write!(f, "custom<{}>", name),
        }
    }
}
