//! The resolution pipeline
//!
//! Turns one accessor call into a typed value. The stages run in a fixed
//! order and each can be switched off per accessor through its disabled
//! [`Feature`]s:
//!
//! 1. derive the canonical key and expand `${...}` in it, call arguments
//!    answering numeric references
//! 2. substitute the first argument into the key's `%s` hole
//! 3. look the key up
//! 4. on a miss, retry with the unexpanded canonical key
//! 5. on a miss or a default value, aggregate the key as a namespace pattern
//! 6. stop with `None` if there is still nothing
//! 7. decrypt
//! 8. run the preprocessor chain
//! 9. expand `${...}` in the value
//! 10. format the value with all call arguments
//! 11. convert to the declared return type
//!
//! Resolution never writes to the store.

use crate::key::KeyDeriver;
use crate::namespace;
use crate::preprocess::{self, PreprocessorResolver};
use crate::settings::Settings;
use crate::store::PropertyStore;
use crate::Result;
use props_convert::Converter;
use props_meta::{Arg, Feature, MethodDescriptor, Value};
use props_text::Substitutor;

/// Borrowed view of the collaborators one resolution needs.
#[derive(Clone, Copy)]
pub struct Pipeline<'a> {
    pub store: &'a dyn PropertyStore,
    pub keys: &'a dyn KeyDeriver,
    pub substitutor: &'a Substitutor,
    pub preprocessors: &'a dyn PreprocessorResolver,
    pub converter: &'a dyn Converter,
    pub settings: &'a Settings,
}

impl Pipeline<'_> {
    /// Resolve `method` called with `args`.
    ///
    /// `Ok(None)` means the property is absent or the converter produced an
    /// explicit null. Conversion and decryption failures are returned as
    /// errors.
    pub fn resolve(&self, method: &MethodDescriptor, args: &[Arg]) -> Result<Option<Value>> {
        let canonical = self.keys.canonical_key(method);
        let key = self.expand_key(method, &canonical, args);
        let key = self.format_key(key, args);

        let mut value = self.store.get_property(&key);
        if value.is_none() {
            value = self.lookup_unexpanded_key(method, &canonical, &key);
        }

        if self.settings.namespace_aggregation
            && (value.is_none() || self.is_default_value_selected(method, value.as_deref()))
        {
            value = namespace::aggregate_by_pattern(self.store, &key, value, self.settings);
        }

        let Some(raw) = value else {
            tracing::trace!(method = method.name(), %key, "Property not found");
            return Ok(None);
        };

        let value = self.store.decrypt(method, &raw)?;
        let value = self.preprocess(method, value)?;
        let value = self.expand_value(method, value);
        let value = self.format_value(method, value, args);

        let converted = self
            .converter
            .convert(method, method.return_type(), &value)?;
        Ok(converted.into_option())
    }

    fn expand_key(&self, method: &MethodDescriptor, canonical: &str, args: &[Arg]) -> String {
        if method.is_disabled(Feature::VariableExpansion) {
            return canonical.to_string();
        }
        self.substitutor.replace_with(canonical, args)
    }

    fn format_key(&self, key: String, args: &[Arg]) -> String {
        let Some(first) = args.first() else {
            return key;
        };
        match props_text::format(&key, &[Arg::Str(first.to_string())]) {
            Ok(formatted) => formatted,
            Err(e) => {
                tracing::trace!(%key, error = %e, "Key left unformatted");
                key
            }
        }
    }

    /// Second lookup with the key exactly as declared, so that a stored
    /// entry literally named `service.${env}.url` still resolves.
    fn lookup_unexpanded_key(
        &self,
        method: &MethodDescriptor,
        canonical: &str,
        key: &str,
    ) -> Option<String> {
        if method.is_disabled(Feature::VariableExpansion) || canonical == key {
            return None;
        }
        let value = self.store.get_property(canonical);
        if value.is_some() {
            tracing::debug!(method = method.name(), canonical, "Resolved through unexpanded key");
        }
        value
    }

    fn is_default_value_selected(&self, method: &MethodDescriptor, value: Option<&str>) -> bool {
        matches!((method.default_value(), value), (Some(d), Some(v)) if d == v)
    }

    fn preprocess(&self, method: &MethodDescriptor, value: String) -> Result<String> {
        let chain = self.preprocessors.resolve(method)?;
        Ok(preprocess::apply_chain(&chain, value))
    }

    fn expand_value(&self, method: &MethodDescriptor, value: String) -> String {
        if method.is_disabled(Feature::VariableExpansion) {
            return value;
        }
        self.substitutor.replace(&value)
    }

    fn format_value(&self, method: &MethodDescriptor, value: String, args: &[Arg]) -> String {
        if method.is_disabled(Feature::ParameterFormatting) || args.is_empty() {
            return value;
        }
        match props_text::format(&value, args) {
            Ok(formatted) => formatted,
            Err(e) => {
                tracing::debug!(method = method.name(), error = %e, "Value left unformatted");
                value
            }
        }
    }
}
