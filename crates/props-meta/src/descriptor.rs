//! Accessor descriptors
//!
//! A [`MethodDescriptor`] is everything the resolution pipeline needs to know
//! about one accessor. It is built once when the configuration interface is
//! declared and never changes afterwards.
//!
//! # Example
//!
//! ```
//! use props_meta::{ArgKind, Feature, MethodDescriptor, TargetType};
//!
//! let port = MethodDescriptor::new("port", TargetType::U16)
//!     .with_key("server.port")
//!     .with_default("8080");
//!
//! let greeting = MethodDescriptor::new("greeting", TargetType::String)
//!     .with_params([ArgKind::Str])
//!     .disable(Feature::VariableExpansion);
//!
//! assert_eq!(port.explicit_key(), Some("server.port"));
//! assert!(greeting.is_disabled(Feature::VariableExpansion));
//! ```

use crate::arg::ArgKind;
use crate::feature::{Feature, FeatureSet};
use crate::target::TargetType;
use std::fmt;
use std::time::Duration;

/// Separator used to split list values when the accessor declares none.
pub const DEFAULT_SEPARATOR: &str = ",";

/// Identity of a callable method: its name and parameter kinds.
///
/// Delegate bindings are matched against accessors by signature equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: String,
    pub params: Vec<ArgKind>,
}

impl Signature {
    pub fn new(name: impl Into<String>, params: impl IntoIterator<Item = ArgKind>) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().collect(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")
    }
}

/// Unit applied to duration values that carry no explicit unit suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Nanos,
    Micros,
    #[default]
    Millis,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl DurationUnit {
    /// Build a duration of `amount` units, `None` on overflow.
    pub fn duration(self, amount: u64) -> Option<Duration> {
        let per_unit_secs: u64 = match self {
            DurationUnit::Nanos => return Some(Duration::from_nanos(amount)),
            DurationUnit::Micros => return Some(Duration::from_micros(amount)),
            DurationUnit::Millis => return Some(Duration::from_millis(amount)),
            DurationUnit::Seconds => 1,
            DurationUnit::Minutes => 60,
            DurationUnit::Hours => 3_600,
            DurationUnit::Days => 86_400,
        };
        amount.checked_mul(per_unit_secs).map(Duration::from_secs)
    }
}

/// Immutable description of one accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    name: String,
    key: Option<String>,
    default_value: Option<String>,
    return_type: TargetType,
    params: Vec<ArgKind>,
    disabled: FeatureSet,
    separator: Option<String>,
    duration_unit: DurationUnit,
    encrypted: bool,
    decryptor: Option<String>,
    preprocessors: Vec<String>,
    converter: Option<String>,
}

impl MethodDescriptor {
    /// Describe an accessor with the given name and return type.
    ///
    /// Without a key override the property key is the accessor name.
    pub fn new(name: impl Into<String>, return_type: TargetType) -> Self {
        Self {
            name: name.into(),
            key: None,
            default_value: None,
            return_type,
            params: Vec::new(),
            disabled: FeatureSet::empty(),
            separator: None,
            duration_unit: DurationUnit::default(),
            encrypted: false,
            decryptor: None,
            preprocessors: Vec::new(),
            converter: None,
        }
    }

    /// Override the property key (builder pattern).
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Declare the default value literal.
    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self
    }

    /// Declare the parameter kinds the accessor accepts.
    pub fn with_params(mut self, params: impl IntoIterator<Item = ArgKind>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Disable a resolution feature for this accessor.
    pub fn disable(mut self, feature: Feature) -> Self {
        self.disabled.insert(feature);
        self
    }

    /// Disable every feature in `features` in addition to those already set.
    pub fn disable_all(mut self, features: FeatureSet) -> Self {
        self.disabled = self.disabled.union(features);
        self
    }

    /// Split list values on `separator` instead of `,`.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_duration_unit(mut self, unit: DurationUnit) -> Self {
        self.duration_unit = unit;
        self
    }

    /// Mark the stored value as encrypted, decrypted with the store's default decryptor.
    pub fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }

    /// Mark the stored value as encrypted with the named decryptor.
    pub fn encrypted_with(mut self, decryptor: impl Into<String>) -> Self {
        self.encrypted = true;
        self.decryptor = Some(decryptor.into());
        self
    }

    /// Append a named preprocessor to this accessor's chain.
    pub fn with_preprocessor(mut self, name: impl Into<String>) -> Self {
        self.preprocessors.push(name.into());
        self
    }

    /// Convert with the converter registered under `name`.
    pub fn with_converter(mut self, name: impl Into<String>) -> Self {
        self.converter = Some(name.into());
        self
    }

    /// Apply interface-level settings: disabled features are merged and the
    /// interface preprocessors run before the accessor's own.
    pub fn inherit(mut self, disabled: FeatureSet, preprocessors: &[String]) -> Self {
        self.disabled = self.disabled.union(disabled);
        if !preprocessors.is_empty() {
            let own = std::mem::take(&mut self.preprocessors);
            self.preprocessors = preprocessors.iter().cloned().chain(own).collect();
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn explicit_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn return_type(&self) -> &TargetType {
        &self.return_type
    }

    pub fn params(&self) -> &[ArgKind] {
        &self.params
    }

    pub fn disabled_features(&self) -> FeatureSet {
        self.disabled
    }

    /// Whether `feature` is disabled for this accessor.
    pub fn is_disabled(&self, feature: Feature) -> bool {
        self.disabled.contains(feature)
    }

    /// The list separator, defaulting to `,`.
    pub fn separator(&self) -> &str {
        self.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR)
    }

    pub fn duration_unit(&self) -> DurationUnit {
        self.duration_unit
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn decryptor(&self) -> Option<&str> {
        self.decryptor.as_deref()
    }

    pub fn preprocessors(&self) -> &[String] {
        &self.preprocessors
    }

    pub fn converter(&self) -> Option<&str> {
        self.converter.as_deref()
    }

    /// The accessor's signature, used for delegate matching.
    pub fn signature(&self) -> Signature {
        Signature::new(self.name.clone(), self.params.iter().copied())
    }
}
