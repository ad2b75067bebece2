//! Declared accessors of a configuration interface

use crate::handler::ConfigHandler;
use crate::key::KeyDeriver;
use crate::store;
use crate::Result;
use props_meta::{Arg, Feature, FeatureSet, MethodDescriptor, Signature, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Body of a default method. It receives the handler so it can call other
/// accessors.
pub type DefaultBody =
    Arc<dyn Fn(&ConfigHandler, &[Arg]) -> Result<Option<Value>> + Send + Sync>;

/// One declared accessor.
#[derive(Clone)]
pub struct Accessor {
    descriptor: MethodDescriptor,
    body: Option<DefaultBody>,
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("descriptor", &self.descriptor)
            .field("default_method", &self.body.is_some())
            .finish()
    }
}

impl Accessor {
    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    /// The default-method body, if this accessor has one.
    pub fn body(&self) -> Option<&DefaultBody> {
        self.body.as_ref()
    }
}

/// A named set of accessors plus interface-wide settings.
///
/// Interface settings (`disable`, `preprocessor`) apply to every accessor,
/// whenever they are declared.
///
/// ```
/// use props_core::ConfigSchema;
/// use props_meta::{ArgKind, MethodDescriptor, TargetType};
///
/// let schema = ConfigSchema::new("ServerConfig")
///     .method(MethodDescriptor::new("port", TargetType::U16).with_default("8080"))
///     .method(
///         MethodDescriptor::new("greeting", TargetType::String).with_params([ArgKind::Str]),
///     )
///     .with_reloadable();
///
/// assert_eq!(schema.len(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConfigSchema {
    name: String,
    disabled: FeatureSet,
    preprocessors: Vec<String>,
    accessors: Vec<Accessor>,
    index: HashMap<Signature, usize>,
}

impl ConfigSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Disable a feature for every accessor.
    pub fn disable(mut self, feature: Feature) -> Self {
        self.disabled.insert(feature);
        self
    }

    /// Add an interface-level preprocessor. These run before the accessor's own.
    pub fn preprocessor(mut self, name: impl Into<String>) -> Self {
        self.preprocessors.push(name.into());
        self
    }

    /// Declare an accessor. A later declaration with the same signature
    /// replaces the earlier one.
    pub fn method(self, descriptor: MethodDescriptor) -> Self {
        self.insert(Accessor {
            descriptor,
            body: None,
        })
    }

    /// Declare an accessor with a body that runs instead of resolution.
    pub fn default_method<F>(self, descriptor: MethodDescriptor, body: F) -> Self
    where
        F: Fn(&ConfigHandler, &[Arg]) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.insert(Accessor {
            descriptor,
            body: Some(Arc::new(body)),
        })
    }

    /// Expose `get_property`, `property_names` and `list`.
    pub fn with_accessible(self) -> Self {
        store::accessible_methods()
            .into_iter()
            .fold(self, |schema, m| schema.method(m))
    }

    /// Expose `set_property`, `remove_property` and `clear`.
    pub fn with_mutable(self) -> Self {
        store::mutable_methods()
            .into_iter()
            .fold(self, |schema, m| schema.method(m))
    }

    pub fn with_reloadable(self) -> Self {
        store::reloadable_methods()
            .into_iter()
            .fold(self, |schema, m| schema.method(m))
    }

    fn insert(mut self, accessor: Accessor) -> Self {
        let signature = accessor.descriptor.signature();
        match self.index.get(&signature) {
            Some(&i) => self.accessors[i] = accessor,
            None => {
                self.index.insert(signature, self.accessors.len());
                self.accessors.push(accessor);
            }
        }
        self
    }

    /// Look up an accessor by signature.
    pub fn accessor(&self, signature: &Signature) -> Option<&Accessor> {
        self.index.get(signature).map(|&i| &self.accessors[i])
    }

    /// Accessors in declaration order.
    pub fn accessors(&self) -> impl Iterator<Item = &Accessor> {
        self.accessors.iter()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.accessors.iter().map(|a| &a.descriptor)
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// Default literals keyed by canonical (unexpanded) key, for seeding a store.
    pub fn defaults(&self, keys: &dyn KeyDeriver) -> HashMap<String, String> {
        self.descriptors()
            .filter_map(|m| {
                m.default_value()
                    .map(|v| (keys.canonical_key(m), v.to_string()))
            })
            .collect()
    }

    /// Fold interface settings into every descriptor.
    pub(crate) fn into_resolved(mut self) -> Self {
        let disabled = std::mem::take(&mut self.disabled);
        let preprocessors = std::mem::take(&mut self.preprocessors);
        if disabled.is_empty() && preprocessors.is_empty() {
            return self;
        }

        self.accessors = std::mem::take(&mut self.accessors)
            .into_iter()
            .map(|accessor| Accessor {
                descriptor: accessor.descriptor.inherit(disabled, &preprocessors),
                body: accessor.body,
            })
            .collect();
        self
    }
}
