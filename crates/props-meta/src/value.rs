//! Typed values produced by conversion

use crate::error::{Result, ValueError};
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A converted property value.
///
/// `Display` renders the property-string form, which the default converter
/// accepts back for the same target type.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Path(PathBuf),
    Duration(Duration),
    List(Vec<Value>),
    /// Output of a custom converter
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap an arbitrary value produced by a custom converter.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Value::Custom(Arc::new(value))
    }

    /// A short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Path(_) => "path",
            Value::Duration(_) => "duration",
            Value::List(_) => "list",
            Value::Custom(_) => "custom",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Downcast a custom value to a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Extract a Rust value of type `T`.
    pub fn into_typed<T: FromValue>(self) -> Result<T> {
        T::from_value(self)
    }
}

/// Render a duration using the largest unit that divides it exactly.
fn fmt_duration(duration: &Duration, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    const UNITS: [(u128, &str); 7] = [
        (86_400_000_000_000, "d"),
        (3_600_000_000_000, "h"),
        (60_000_000_000, "m"),
        (1_000_000_000, "s"),
        (1_000_000, "ms"),
        (1_000, "us"),
        (1, "ns"),
    ];

    let nanos = duration.as_nanos();
    if nanos == 0 {
        return f.write_str("0 ms");
    }
    for (size, unit) in UNITS {
        if nanos % size == 0 {
            return write!(f, "{} {}", nanos / size, unit);
        }
    }
    write!(f, "{} ns", nanos)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "{}", c),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::Duration(d) => fmt_duration(d, f),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Custom(_) => f.write_str("<custom>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Value::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Value::Path(v) => f.debug_tuple("Path").field(v).finish(),
            Value::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            Value::List(v) => f.debug_tuple("List").field(v).finish(),
            Value::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Extraction of a Rust type from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &'static str, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        found: found.kind_name(),
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(mismatch("char", &other)),
        }
    }
}

macro_rules! integer_from_value {
    ($($ty:ty),*) => {
        $(impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self> {
                let converted = match &value {
                    Value::Int(v) => <$ty>::try_from(*v).ok(),
                    Value::UInt(v) => <$ty>::try_from(*v).ok(),
                    other => return Err(mismatch(stringify!($ty), other)),
                };
                converted.ok_or_else(|| ValueError::OutOfRange {
                    value: value.to_string(),
                    target: stringify!($ty),
                })
            }
        })*
    };
}

integer_from_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::UInt(v) => Ok(v as f64),
            other => Err(mismatch("f64", &other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl FromValue for PathBuf {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Path(p) => Ok(p),
            Value::Str(s) => Ok(PathBuf::from(s)),
            other => Err(mismatch("path", &other)),
        }
    }
}

impl FromValue for Duration {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Duration(d) => Ok(d),
            other => Err(mismatch("duration", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch("list", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_integer_extraction_checks_range() {
        assert_eq!(Value::UInt(8080).into_typed::<u16>().unwrap(), 8080);
        assert_eq!(Value::Int(-1).into_typed::<i8>().unwrap(), -1);

        let err = Value::UInt(70_000).into_typed::<u16>().unwrap_err();
        assert!(matches!(err, ValueError::OutOfRange { target: "u16", .. }));

        let err = Value::Int(-1).into_typed::<u32>().unwrap_err();
        assert!(matches!(err, ValueError::OutOfRange { .. }));
    }

    #[test]
    fn test_mismatch_names_both_kinds() {
        let err = Value::Str("x".into()).into_typed::<bool>().unwrap_err();
        assert_eq!(
            err,
            ValueError::TypeMismatch {
                expected: "bool",
                found: "string"
            }
        );
    }

    #[test]
    fn test_list_extraction_is_element_wise() {
        let value = Value::List(vec![Value::UInt(1), Value::UInt(2)]);
        let ports: Vec<u16> = value.into_typed().unwrap();
        assert_eq!(ports, vec![1, 2]);
    }

    #[test]
    fn test_duration_display_uses_largest_exact_unit() {
        assert_eq!(Value::Duration(Duration::from_secs(120)).to_string(), "2 m");
        assert_eq!(Value::Duration(Duration::from_millis(1500)).to_string(), "1500 ms");
        assert_eq!(Value::Duration(Duration::from_nanos(7)).to_string(), "7 ns");
        assert_eq!(Value::Duration(Duration::ZERO).to_string(), "0 ms");
    }

    #[test]
    fn test_custom_values_compare_by_identity() {
        let a = Value::custom(5u8);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::custom(5u8));
        assert_eq!(a.downcast_ref::<u8>(), Some(&5));
    }
}
