//! The converter seam and its default implementation

use crate::duration::parse_duration;
use crate::error::{Error, Result};
use props_meta::{MethodDescriptor, TargetType, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Boxed error returned by custom converters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    /// A typed value
    Value(Value),
    /// The converter deliberately produced no value
    Null,
}

impl Converted {
    /// Collapse into an optional value.
    pub fn into_option(self) -> Option<Value> {
        match self {
            Converted::Value(value) => Some(value),
            Converted::Null => None,
        }
    }
}

/// Turns a property string into the declared return type of an accessor.
pub trait Converter: Send + Sync {
    fn convert(&self, method: &MethodDescriptor, target: &TargetType, text: &str)
    -> Result<Converted>;
}

/// A user-supplied conversion for one named type.
///
/// Returning `Ok(None)` yields an explicit null.
pub trait CustomConverter: Send + Sync {
    fn convert(
        &self,
        method: &MethodDescriptor,
        text: &str,
    ) -> std::result::Result<Option<Value>, BoxError>;
}

impl<F> CustomConverter for F
where
    F: Fn(&MethodDescriptor, &str) -> std::result::Result<Option<Value>, BoxError> + Send + Sync,
{
    fn convert(
        &self,
        method: &MethodDescriptor,
        text: &str,
    ) -> std::result::Result<Option<Value>, BoxError> {
        self(method, text)
    }
}

/// Default converter with a registry of named custom converters.
///
/// Resolution order for a scalar (or each list element):
/// 1. the accessor's named converter, if it declares one
/// 2. the built-in rule for the target type
/// 3. for [`TargetType::Custom`], the converter registered under that name
#[derive(Clone, Default)]
pub struct Converters {
    custom: HashMap<String, Arc<dyn CustomConverter>>,
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.custom.keys().collect();
        names.sort();
        f.debug_struct("Converters").field("custom", &names).finish()
    }
}

impl Converters {
    /// Create a converter with no custom converters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom converter under `name`.
    pub fn register(&mut self, name: impl Into<String>, converter: impl CustomConverter + 'static) {
        self.custom.insert(name.into(), Arc::new(converter));
    }

    /// Builder-style [`Converters::register`].
    pub fn with(mut self, name: impl Into<String>, converter: impl CustomConverter + 'static) -> Self {
        self.register(name, converter);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name)
    }

    fn custom(&self, name: &str) -> Result<&Arc<dyn CustomConverter>> {
        self.custom.get(name).ok_or_else(|| Error::UnknownConverter {
            name: name.to_string(),
        })
    }

    fn convert_list(
        &self,
        method: &MethodDescriptor,
        element: &TargetType,
        text: &str,
    ) -> Result<Converted> {
        if text.trim().is_empty() {
            return Ok(Converted::Value(Value::List(Vec::new())));
        }

        let mut items = Vec::new();
        for token in text.split(method.separator()) {
            // Explicit nulls are dropped from lists.
            if let Converted::Value(value) = self.convert_scalar(method, element, token.trim())? {
                items.push(value);
            }
        }
        Ok(Converted::Value(Value::List(items)))
    }

    fn convert_scalar(
        &self,
        method: &MethodDescriptor,
        target: &TargetType,
        text: &str,
    ) -> Result<Converted> {
        let fail = |reason: String| Error::Conversion {
            method: method.name().to_string(),
            target: target.to_string(),
            value: text.to_string(),
            reason,
        };

        if let Some(name) = method.converter() {
            let converted = self
                .custom(name)?
                .convert(method, text)
                .map_err(|e| fail(e.to_string()))?;
            return Ok(converted.map_or(Converted::Null, Converted::Value));
        }

        let value = match target {
            TargetType::Bool => parse_bool(text).map(Value::Bool).map_err(fail)?,
            TargetType::Char => parse_char(text).map(Value::Char).map_err(fail)?,
            TargetType::I8 => parse_signed(text, i8::MIN.into(), i8::MAX.into()).map_err(fail)?,
            TargetType::I16 => parse_signed(text, i16::MIN.into(), i16::MAX.into()).map_err(fail)?,
            TargetType::I32 => parse_signed(text, i32::MIN.into(), i32::MAX.into()).map_err(fail)?,
            TargetType::I64 => parse_signed(text, i64::MIN, i64::MAX).map_err(fail)?,
            TargetType::U8 => parse_unsigned(text, u8::MAX.into()).map_err(fail)?,
            TargetType::U16 => parse_unsigned(text, u16::MAX.into()).map_err(fail)?,
            TargetType::U32 => parse_unsigned(text, u32::MAX.into()).map_err(fail)?,
            TargetType::U64 => parse_unsigned(text, u64::MAX).map_err(fail)?,
            TargetType::F32 => text
                .trim()
                .parse::<f32>()
                .map(|v| Value::Float(f64::from(v)))
                .map_err(|e| fail(e.to_string()))?,
            TargetType::F64 => text
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| fail(e.to_string()))?,
            TargetType::String => Value::Str(text.to_string()),
            TargetType::Path => Value::Path(text.into()),
            TargetType::Duration => parse_duration(text, method.duration_unit())
                .map(Value::Duration)
                .map_err(fail)?,
            TargetType::Enum(variants) => {
                let candidate = text.trim();
                match variants.iter().find(|v| v.as_str() == candidate) {
                    Some(variant) => Value::Str(variant.clone()),
                    None => {
                        return Err(fail(format!("expected one of [{}]", variants.join(", "))));
                    }
                }
            }
            TargetType::List(element) => return self.convert_list(method, element, text),
            TargetType::Custom(name) => {
                let converted = self
                    .custom(name)?
                    .convert(method, text)
                    .map_err(|e| fail(e.to_string()))?;
                return Ok(converted.map_or(Converted::Null, Converted::Value));
            }
        };
        Ok(Converted::Value(value))
    }
}

impl Converter for Converters {
    fn convert(
        &self,
        method: &MethodDescriptor,
        target: &TargetType,
        text: &str,
    ) -> Result<Converted> {
        let converted = match target {
            TargetType::List(element) => self.convert_list(method, element, text),
            scalar => self.convert_scalar(method, scalar, text),
        };
        if let Err(e) = &converted {
            tracing::debug!(method = %method.name(), target = %target, error = %e, "Conversion failed");
        }
        converted
    }
}

fn parse_bool(text: &str) -> std::result::Result<bool, String> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err("expected true/false, yes/no, on/off or 1/0".to_string()),
    }
}

fn parse_char(text: &str) -> std::result::Result<char, String> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err("expected exactly one character".to_string()),
    }
}

fn parse_signed(text: &str, min: i64, max: i64) -> std::result::Result<Value, String> {
    let v: i64 = text.trim().parse().map_err(|e| format!("{}", e))?;
    if v < min || v > max {
        return Err(format!("out of range [{}, {}]", min, max));
    }
    Ok(Value::Int(v))
}

fn parse_unsigned(text: &str, max: u64) -> std::result::Result<Value, String> {
    let v: u64 = text.trim().parse().map_err(|e| format!("{}", e))?;
    if v > max {
        return Err(format!("out of range [0, {}]", max));
    }
    Ok(Value::UInt(v))
}
