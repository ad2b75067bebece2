//! Accessor invocation
//!
//! [`ConfigHandler`] is the runtime face of a [`ConfigSchema`]: every call
//! goes through the store's reload check, then a default-method body, a
//! delegate or the resolution pipeline, in that order.

use crate::delegate::{self, DelegateBinding, DelegateSlot, DelegateTarget};
use crate::key::{DefaultKeyDeriver, KeyDeriver};
use crate::pipeline::Pipeline;
use crate::preprocess::{PreprocessorRegistry, PreprocessorResolver};
use crate::schema::{Accessor, ConfigSchema};
use crate::settings::Settings;
use crate::store::PropertyStore;
use crate::{Error, Result};
use props_convert::{Converter, Converters};
use props_meta::{Arg, FromValue, MethodDescriptor, Signature, Value};
use props_text::Substitutor;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Resolves accessor calls for one configuration instance.
///
/// Cheap to clone; clones share the store and collaborators. The delegate
/// bindings are recomputed lazily by each clone.
pub struct ConfigHandler {
    schema: Arc<ConfigSchema>,
    store: Arc<dyn PropertyStore>,
    auxiliary: Option<Arc<dyn DelegateTarget>>,
    substitutor: Arc<Substitutor>,
    keys: Arc<dyn KeyDeriver>,
    preprocessors: Arc<dyn PreprocessorResolver>,
    converter: Arc<dyn Converter>,
    settings: Settings,
    delegates: OnceLock<Vec<DelegateBinding>>,
}

impl Clone for ConfigHandler {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            store: Arc::clone(&self.store),
            auxiliary: self.auxiliary.clone(),
            substitutor: Arc::clone(&self.substitutor),
            keys: Arc::clone(&self.keys),
            preprocessors: Arc::clone(&self.preprocessors),
            converter: Arc::clone(&self.converter),
            settings: self.settings.clone(),
            delegates: OnceLock::new(),
        }
    }
}

impl fmt::Debug for ConfigHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigHandler")
            .field("schema", &self.schema.name())
            .field("accessors", &self.schema.len())
            .field("snapshot", &self.substitutor.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl ConfigHandler {
    pub fn builder(schema: ConfigSchema, store: Arc<dyn PropertyStore>) -> ConfigHandlerBuilder {
        ConfigHandlerBuilder {
            schema,
            store,
            auxiliary: None,
            converter: None,
            keys: None,
            preprocessors: None,
            settings: Settings::default(),
        }
    }

    /// Call the accessor `name` with `args`.
    ///
    /// The accessor is selected by name and the kinds of `args`, so
    /// overloads are supported.
    pub fn invoke(&self, name: &str, args: &[Arg]) -> Result<Option<Value>> {
        let signature = Signature::new(name, args.iter().map(Arg::kind));
        let accessor = self
            .schema
            .accessor(&signature)
            .ok_or_else(|| Error::UnknownMethod {
                signature: signature.to_string(),
            })?;
        self.invoke_accessor(accessor, args)
    }

    /// Call a declared accessor.
    pub fn invoke_accessor(&self, accessor: &Accessor, args: &[Arg]) -> Result<Option<Value>> {
        self.store.reload_if_needed()?;

        if let Some(body) = accessor.body() {
            tracing::trace!(method = accessor.descriptor().name(), "Running default method");
            return body(self, args);
        }

        if let Some(binding) = self.delegate_for(accessor.descriptor()) {
            return self.call_delegate(binding, args);
        }

        self.pipeline().resolve(accessor.descriptor(), args)
    }

    /// Call `name` and extract the result as `T`.
    pub fn get<T: FromValue>(&self, name: &str, args: &[Arg]) -> Result<Option<T>> {
        match self.invoke(name, args)? {
            Some(value) => Ok(Some(value.into_typed()?)),
            None => Ok(None),
        }
    }

    /// Current delegate bindings, computed on first use.
    pub fn delegates(&self) -> &[DelegateBinding] {
        self.delegates.get_or_init(|| {
            delegate::find_delegates(self.store.as_ref(), self.auxiliary.as_deref())
        })
    }

    /// Drop cached delegate bindings; the next call recomputes them.
    pub fn refresh_delegates(&mut self) {
        self.delegates = OnceLock::new();
    }

    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }

    pub fn accessors(&self) -> impl Iterator<Item = &Accessor> {
        self.schema.accessors()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn delegate_for(&self, method: &MethodDescriptor) -> Option<&DelegateBinding> {
        self.delegates().iter().find(|b| b.matches(method))
    }

    fn call_delegate(&self, binding: &DelegateBinding, args: &[Arg]) -> Result<Option<Value>> {
        tracing::trace!(signature = %binding.signature, slot = ?binding.slot, "Forwarding to delegate");
        match binding.slot {
            DelegateSlot::Store => self.store.call_delegate(&binding.signature, args),
            DelegateSlot::Auxiliary => match &self.auxiliary {
                Some(auxiliary) => auxiliary.call_delegate(&binding.signature, args),
                None => Err(Error::UnsupportedDelegate {
                    signature: binding.signature.to_string(),
                }),
            },
        }
    }

    fn pipeline(&self) -> Pipeline<'_> {
        Pipeline {
            store: self.store.as_ref(),
            keys: self.keys.as_ref(),
            substitutor: &self.substitutor,
            preprocessors: self.preprocessors.as_ref(),
            converter: self.converter.as_ref(),
            settings: &self.settings,
        }
    }
}

/// Builder for [`ConfigHandler`].
pub struct ConfigHandlerBuilder {
    schema: ConfigSchema,
    store: Arc<dyn PropertyStore>,
    auxiliary: Option<Arc<dyn DelegateTarget>>,
    converter: Option<Arc<dyn Converter>>,
    keys: Option<Arc<dyn KeyDeriver>>,
    preprocessors: Option<Arc<dyn PreprocessorResolver>>,
    settings: Settings,
}

impl ConfigHandlerBuilder {
    /// Second delegate target, consulted after the store.
    pub fn auxiliary(mut self, target: Arc<dyn DelegateTarget>) -> Self {
        self.auxiliary = Some(target);
        self
    }

    pub fn converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn key_deriver(mut self, keys: Arc<dyn KeyDeriver>) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn preprocessors(mut self, preprocessors: Arc<dyn PreprocessorResolver>) -> Self {
        self.preprocessors = Some(preprocessors);
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Finish the handler. Fails if an accessor names an unknown preprocessor.
    pub fn build(self) -> Result<ConfigHandler> {
        let schema = self
            .settings
            .disabled_features
            .iter()
            .fold(self.schema, |schema, feature| schema.disable(*feature))
            .into_resolved();
        let preprocessors = self
            .preprocessors
            .unwrap_or_else(|| Arc::new(PreprocessorRegistry::new()));

        for accessor in schema.accessors().filter(|a| a.body().is_none()) {
            preprocessors.resolve(accessor.descriptor())?;
        }

        let substitutor = Substitutor::new(self.store.snapshot())
            .with_max_depth(self.settings.max_substitution_depth);

        tracing::debug!(
            schema = schema.name(),
            accessors = schema.len(),
            snapshot = substitutor.len(),
            "Config handler built"
        );

        Ok(ConfigHandler {
            schema: Arc::new(schema),
            store: self.store,
            auxiliary: self.auxiliary,
            substitutor: Arc::new(substitutor),
            keys: self
                .keys
                .unwrap_or_else(|| Arc::new(DefaultKeyDeriver::new())),
            preprocessors,
            converter: self.converter.unwrap_or_else(|| Arc::new(Converters::new())),
            settings: self.settings,
            delegates: OnceLock::new(),
        })
    }
}
