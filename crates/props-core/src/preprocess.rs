//! Preprocessor chains
//!
//! A preprocessor is a text-to-text transform applied to a raw value after
//! decryption and before variable expansion. Accessors name their
//! preprocessors; the interface-level ones run first.

use crate::{Error, Result};
use props_meta::MethodDescriptor;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry name of [`Trim`].
pub const TRIM: &str = "trim";
/// Registry name of [`ToLowerCase`].
pub const TO_LOWER_CASE: &str = "to_lower_case";

/// A text-to-text transform.
pub trait Preprocessor: Send + Sync {
    fn process(&self, input: &str) -> String;
}

impl<F> Preprocessor for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn process(&self, input: &str) -> String {
        self(input)
    }
}

/// Strips leading and trailing whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trim;

impl Preprocessor for Trim {
    fn process(&self, input: &str) -> String {
        input.trim().to_string()
    }
}

/// Lower-cases the whole value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToLowerCase;

impl Preprocessor for ToLowerCase {
    fn process(&self, input: &str) -> String {
        input.to_lowercase()
    }
}

/// Resolves the ordered chain of preprocessors for an accessor.
pub trait PreprocessorResolver: Send + Sync {
    fn resolve(&self, method: &MethodDescriptor) -> Result<Vec<Arc<dyn Preprocessor>>>;
}

/// Named preprocessors; resolves an accessor's chain by name.
#[derive(Clone)]
pub struct PreprocessorRegistry {
    named: HashMap<String, Arc<dyn Preprocessor>>,
}

impl fmt::Debug for PreprocessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.named.keys().collect();
        names.sort();
        f.debug_struct("PreprocessorRegistry")
            .field("named", &names)
            .finish()
    }
}

impl Default for PreprocessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PreprocessorRegistry {
    /// A registry holding the built-in [`Trim`] and [`ToLowerCase`].
    pub fn new() -> Self {
        Self::empty().with(TRIM, Trim).with(TO_LOWER_CASE, ToLowerCase)
    }

    /// A registry with no preprocessors at all.
    pub fn empty() -> Self {
        Self {
            named: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, preprocessor: impl Preprocessor + 'static) {
        self.named.insert(name.into(), Arc::new(preprocessor));
    }

    /// Builder-style [`PreprocessorRegistry::register`].
    pub fn with(mut self, name: impl Into<String>, preprocessor: impl Preprocessor + 'static) -> Self {
        self.register(name, preprocessor);
        self
    }
}

impl PreprocessorResolver for PreprocessorRegistry {
    fn resolve(&self, method: &MethodDescriptor) -> Result<Vec<Arc<dyn Preprocessor>>> {
        method
            .preprocessors()
            .iter()
            .map(|name| {
                self.named
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::UnknownPreprocessor { name: name.clone() })
            })
            .collect()
    }
}

/// Run `value` through `chain` in order.
pub fn apply_chain(chain: &[Arc<dyn Preprocessor>], value: String) -> String {
    chain.iter().fold(value, |acc, p| p.process(&acc))
}
