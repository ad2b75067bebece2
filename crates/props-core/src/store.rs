//! Property storage and reloading
//!
//! [`PropertyStore`] is what the pipeline reads from. [`MemoryStore`] is the
//! in-process implementation: a layered map of schema defaults, explicit
//! properties and an optional [`PropertySource`], swapped wholesale on reload.

use crate::decrypt::{Decryptor, DecryptorRegistry, IdentityDecryptor};
use crate::delegate::DelegateTarget;
use crate::{Error, Result};
use parking_lot::{Mutex, RwLock};
use props_meta::{Arg, ArgKind, MethodDescriptor, Signature, TargetType, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Name of the delegated single-key lookup (also used with a default).
pub const GET_PROPERTY: &str = "get_property";
pub const PROPERTY_NAMES: &str = "property_names";
pub const LIST: &str = "list";
pub const SET_PROPERTY: &str = "set_property";
pub const REMOVE_PROPERTY: &str = "remove_property";
pub const CLEAR: &str = "clear";
pub const RELOAD: &str = "reload";

/// Key/value storage consulted by the resolution pipeline.
///
/// Implementations must serialize reloads: concurrent callers of
/// [`PropertyStore::reload_if_needed`] never observe a half-applied reload
/// and never run overlapping reload work.
pub trait PropertyStore: DelegateTarget {
    /// Apply a pending reload, if any.
    fn reload_if_needed(&self) -> Result<()>;

    /// Raw string value of `key`.
    fn get_property(&self, key: &str) -> Option<String>;

    /// Every key currently present.
    fn property_names(&self) -> Vec<String>;

    /// Copy of the whole map, used to build the substitutor.
    fn snapshot(&self) -> HashMap<String, String>;

    /// Decrypt `value` if `method` is marked encrypted.
    fn decrypt(&self, method: &MethodDescriptor, value: &str) -> Result<String>;
}

/// External supplier of properties, e.g. a file or remote loader.
pub trait PropertySource: Send + Sync {
    fn load(&self) -> Result<HashMap<String, String>>;

    /// Whether the backing data changed since the last [`PropertySource::load`].
    fn needs_reload(&self) -> bool {
        false
    }
}

/// Descriptors of the read-only delegated methods.
pub fn accessible_methods() -> Vec<MethodDescriptor> {
    vec![
        MethodDescriptor::new(GET_PROPERTY, TargetType::String).with_params([ArgKind::Str]),
        MethodDescriptor::new(GET_PROPERTY, TargetType::String)
            .with_params([ArgKind::Str, ArgKind::Str]),
        MethodDescriptor::new(PROPERTY_NAMES, TargetType::list(TargetType::String)),
        MethodDescriptor::new(LIST, TargetType::String),
    ]
}

/// Descriptors of the mutating delegated methods.
pub fn mutable_methods() -> Vec<MethodDescriptor> {
    vec![
        MethodDescriptor::new(SET_PROPERTY, TargetType::String)
            .with_params([ArgKind::Str, ArgKind::Str]),
        MethodDescriptor::new(REMOVE_PROPERTY, TargetType::String).with_params([ArgKind::Str]),
        MethodDescriptor::new(CLEAR, TargetType::String),
    ]
}

pub fn reloadable_methods() -> Vec<MethodDescriptor> {
    vec![MethodDescriptor::new(RELOAD, TargetType::String)]
}

/// In-memory property store.
///
/// Lookup order on (re)load is defaults, then explicit properties, then the
/// source, later layers overriding earlier ones.
pub struct MemoryStore {
    defaults: HashMap<String, String>,
    base: HashMap<String, String>,
    properties: RwLock<HashMap<String, String>>,
    source: Option<Arc<dyn PropertySource>>,
    reload_lock: Mutex<()>,
    reload_pending: AtomicBool,
    reload_count: AtomicUsize,
    decryptors: DecryptorRegistry,
    default_decryptor: Option<Arc<dyn Decryptor>>,
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("properties", &self.properties.read().len())
            .field("has_source", &self.source.is_some())
            .field("reload_count", &self.reload_count())
            .field("decryptors", &self.decryptors)
            .finish()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            defaults: HashMap::new(),
            base: HashMap::new(),
            properties: RwLock::new(HashMap::new()),
            source: None,
            reload_lock: Mutex::new(()),
            reload_pending: AtomicBool::new(false),
            reload_count: AtomicUsize::new(0),
            decryptors: DecryptorRegistry::new(),
            default_decryptor: None,
        }
    }

    /// Seed default values. Keys already present keep their value.
    pub fn with_defaults(mut self, defaults: HashMap<String, String>) -> Self {
        {
            let properties = self.properties.get_mut();
            for (key, value) in &defaults {
                properties
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
        }
        self.defaults.extend(defaults);
        self
    }

    /// Overlay explicit properties.
    pub fn with_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in properties {
            let (key, value) = (key.into(), value.into());
            self.properties.get_mut().insert(key.clone(), value.clone());
            self.base.insert(key, value);
        }
        self
    }

    /// Attach a source and overlay its current contents.
    pub fn with_source(mut self, source: impl PropertySource + 'static) -> Result<Self> {
        let loaded = load_source(&source)?;
        tracing::debug!(count = loaded.len(), "Loaded properties from source");
        self.properties.get_mut().extend(loaded);
        self.source = Some(Arc::new(source));
        Ok(self)
    }

    pub fn with_decryptor(mut self, name: impl Into<String>, decryptor: impl Decryptor + 'static) -> Self {
        self.decryptors.register(name, decryptor);
        self
    }

    /// Decryptor for encrypted accessors that do not name one.
    pub fn with_default_decryptor(mut self, decryptor: impl Decryptor + 'static) -> Self {
        self.default_decryptor = Some(Arc::new(decryptor));
        self
    }

    /// Mark a reload as pending; the next accessor call applies it.
    pub fn request_reload(&self) {
        self.reload_pending.store(true, Ordering::Release);
    }

    /// Reload now, regardless of pending state.
    ///
    /// On failure the current map stays in place and a pending request is
    /// kept for the next call.
    pub fn reload(&self) -> Result<()> {
        let _guard = self.reload_lock.lock();
        let pending = self.reload_pending.swap(false, Ordering::AcqRel);
        self.load_or_restore(pending)
    }

    /// Number of reloads materialised so far.
    pub fn reload_count(&self) -> usize {
        self.reload_count.load(Ordering::Acquire)
    }

    /// Set `key`, returning the previous value.
    pub fn set_property(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.write().insert(key.into(), value.into())
    }

    /// Remove `key`, returning the previous value.
    pub fn remove_property(&self, key: &str) -> Option<String> {
        self.properties.write().remove(key)
    }

    pub fn clear(&self) {
        self.properties.write().clear();
    }

    fn source_stale(&self) -> bool {
        self.source.as_ref().is_some_and(|s| s.needs_reload())
    }

    /// Build the layered map and swap it in. Caller holds `reload_lock`.
    fn load_now(&self) -> Result<()> {
        // Readers block until the new map is in place.
        let mut properties = self.properties.write();

        let mut fresh = self.defaults.clone();
        fresh.extend(self.base.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(source) = &self.source {
            fresh.extend(load_source(source.as_ref())?);
        }

        let count = fresh.len();
        *properties = fresh;
        drop(properties);

        let reloads = self.reload_count.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(count, reloads, "Properties reloaded");
        Ok(())
    }

    /// Run [`Self::load_now`], re-arming the pending flag if it fails.
    fn load_or_restore(&self, pending: bool) -> Result<()> {
        let result = self.load_now();
        if result.is_err() && pending {
            self.reload_pending.store(true, Ordering::Release);
        }
        result
    }

    fn listing(&self) -> String {
        let properties = self.properties.read();
        let mut entries: Vec<_> = properties.iter().collect();
        entries.sort();
        entries
            .into_iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect()
    }
}

impl PropertyStore for MemoryStore {
    fn reload_if_needed(&self) -> Result<()> {
        if !self.reload_pending.load(Ordering::Acquire) && !self.source_stale() {
            return Ok(());
        }

        let _guard = self.reload_lock.lock();
        // Whoever held the lock before us may already have reloaded.
        let pending = self.reload_pending.swap(false, Ordering::AcqRel);
        if !pending && !self.source_stale() {
            return Ok(());
        }
        self.load_or_restore(pending)
    }

    fn get_property(&self, key: &str) -> Option<String> {
        self.properties.read().get(key).cloned()
    }

    fn property_names(&self) -> Vec<String> {
        self.properties.read().keys().cloned().collect()
    }

    fn snapshot(&self) -> HashMap<String, String> {
        self.properties.read().clone()
    }

    fn decrypt(&self, method: &MethodDescriptor, value: &str) -> Result<String> {
        if !method.is_encrypted() {
            return Ok(value.to_string());
        }

        let decrypted = match (method.decryptor(), &self.default_decryptor) {
            (Some(name), _) => self.decryptors.get(name)?.decrypt(value),
            (None, Some(decryptor)) => decryptor.decrypt(value),
            (None, None) => IdentityDecryptor.decrypt(value),
        };

        decrypted.map_err(|e| Error::Decryption {
            method: method.name().to_string(),
            message: e.to_string(),
        })
    }
}

fn load_source(source: &dyn PropertySource) -> Result<HashMap<String, String>> {
    source.load().map_err(|e| {
        tracing::warn!(error = %e, "Property source failed to load");
        Error::Reload {
            message: e.to_string(),
        }
    })
}

fn str_arg<'a>(signature: &Signature, args: &'a [Arg], index: usize) -> Result<&'a str> {
    args.get(index)
        .and_then(Arg::as_str)
        .ok_or_else(|| Error::UnsupportedDelegate {
            signature: signature.to_string(),
        })
}

impl DelegateTarget for MemoryStore {
    fn delegate_signatures(&self) -> Vec<Signature> {
        accessible_methods()
            .into_iter()
            .chain(mutable_methods())
            .chain(reloadable_methods())
            .map(|m| m.signature())
            .collect()
    }

    fn call_delegate(&self, signature: &Signature, args: &[Arg]) -> Result<Option<Value>> {
        let value = match (signature.name.as_str(), signature.params.len()) {
            (GET_PROPERTY, 1) => self
                .get_property(str_arg(signature, args, 0)?)
                .map(Value::Str),
            (GET_PROPERTY, 2) => {
                let key = str_arg(signature, args, 0)?;
                let fallback = str_arg(signature, args, 1)?;
                Some(Value::Str(
                    self.get_property(key).unwrap_or_else(|| fallback.to_string()),
                ))
            }
            (PROPERTY_NAMES, 0) => {
                let mut names = self.property_names();
                names.sort();
                Some(Value::List(names.into_iter().map(Value::Str).collect()))
            }
            (LIST, 0) => Some(Value::Str(self.listing())),
            (SET_PROPERTY, 2) => {
                let key = str_arg(signature, args, 0)?;
                let value = str_arg(signature, args, 1)?;
                self.set_property(key, value).map(Value::Str)
            }
            (REMOVE_PROPERTY, 1) => self
                .remove_property(str_arg(signature, args, 0)?)
                .map(Value::Str),
            (CLEAR, 0) => {
                self.clear();
                None
            }
            (RELOAD, 0) => {
                self.reload()?;
                None
            }
            _ => {
                return Err(Error::UnsupportedDelegate {
                    signature: signature.to_string(),
                });
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use props_convert::BoxError;

    fn defaults() -> HashMap<String, String> {
        HashMap::from([
            ("port".to_string(), "8080".to_string()),
            ("host".to_string(), "localhost".to_string()),
        ])
    }

    #[test]
    fn test_layers_override_defaults() {
        let store = MemoryStore::new()
            .with_defaults(defaults())
            .with_properties([("port", "9090")]);

        assert_eq!(store.get_property("port").as_deref(), Some("9090"));
        assert_eq!(store.get_property("host").as_deref(), Some("localhost"));
        assert_eq!(store.get_property("missing"), None);
    }

    #[test]
    fn test_defaults_do_not_clobber_explicit_values() {
        let store = MemoryStore::new()
            .with_properties([("port", "1")])
            .with_defaults(defaults());
        assert_eq!(store.get_property("port").as_deref(), Some("1"));
    }

    #[test]
    fn test_reload_discards_runtime_edits() {
        let store = MemoryStore::new().with_defaults(defaults());
        store.set_property("port", "1");
        store.set_property("extra", "x");

        store.reload().unwrap();

        assert_eq!(store.get_property("port").as_deref(), Some("8080"));
        assert_eq!(store.get_property("extra"), None);
        assert_eq!(store.reload_count(), 1);
    }

    #[test]
    fn test_pending_reload_applied_once() {
        let store = MemoryStore::new();
        store.reload_if_needed().unwrap();
        assert_eq!(store.reload_count(), 0);

        store.request_reload();
        store.reload_if_needed().unwrap();
        store.reload_if_needed().unwrap();
        assert_eq!(store.reload_count(), 1);
    }

    struct FailingSource;

    impl PropertySource for FailingSource {
        fn load(&self) -> Result<HashMap<String, String>> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    #[test]
    fn test_source_failure_is_a_reload_error() {
        let err = MemoryStore::new().with_source(FailingSource).unwrap_err();
        assert!(matches!(&err, Error::Reload { message } if message == "disk gone"));
    }

    #[test]
    fn test_decrypt_selection() {
        let store = MemoryStore::new()
            .with_decryptor("upper", |v: &str| -> std::result::Result<String, BoxError> {
                Ok(v.to_uppercase())
            })
            .with_default_decryptor(|v: &str| -> std::result::Result<String, BoxError> {
                Ok(format!("<{}>", v))
            });

        let plain = MethodDescriptor::new("a", TargetType::String);
        let named = MethodDescriptor::new("b", TargetType::String).encrypted_with("upper");
        let fallback = MethodDescriptor::new("c", TargetType::String).encrypted();

        assert_eq!(store.decrypt(&plain, "v").unwrap(), "v");
        assert_eq!(store.decrypt(&named, "v").unwrap(), "V");
        assert_eq!(store.decrypt(&fallback, "v").unwrap(), "<v>");
    }

    #[test]
    fn test_decrypt_without_decryptors_is_identity() {
        let method = MethodDescriptor::new("a", TargetType::String).encrypted();
        assert_eq!(MemoryStore::new().decrypt(&method, "v").unwrap(), "v");
    }

    #[test]
    fn test_decrypt_failure_names_method() {
        let store = MemoryStore::new().with_default_decryptor(
            |_: &str| -> std::result::Result<String, BoxError> { Err("bad padding".into()) },
        );
        let method = MethodDescriptor::new("secret", TargetType::String).encrypted();

        let err = store.decrypt(&method, "v").unwrap_err();
        assert!(
            matches!(&err, Error::Decryption { method, message } if method == "secret" && message == "bad padding")
        );
    }

    #[test]
    fn test_delegated_mutation() {
        let store = MemoryStore::new().with_defaults(defaults());
        let set = Signature::new(SET_PROPERTY, [ArgKind::Str, ArgKind::Str]);
        let get_or = Signature::new(GET_PROPERTY, [ArgKind::Str, ArgKind::Str]);

        let previous = store
            .call_delegate(&set, &[Arg::from("port"), Arg::from("7070")])
            .unwrap();
        assert_eq!(previous, Some(Value::Str("8080".to_string())));

        let value = store
            .call_delegate(&get_or, &[Arg::from("nope"), Arg::from("dflt")])
            .unwrap();
        assert_eq!(value, Some(Value::Str("dflt".to_string())));

        let listing = store.call_delegate(&Signature::new(LIST, []), &[]).unwrap();
        assert_eq!(
            listing,
            Some(Value::Str("host=localhost\nport=7070\n".to_string()))
        );
    }

    #[test]
    fn test_delegate_rejects_wrong_argument_kind() {
        let store = MemoryStore::new();
        let get = Signature::new(GET_PROPERTY, [ArgKind::Str]);
        let err = store.call_delegate(&get, &[Arg::from(3_i32)]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDelegate { .. }));
    }
}
