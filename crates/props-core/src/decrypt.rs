//! Decryption of stored values
//!
//! Encrypted accessors have their raw value decrypted on every resolution.
//! The cleartext is never written back to the store.

use crate::{Error, Result};
use props_convert::BoxError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Turns a stored (encrypted) value into cleartext.
pub trait Decryptor: Send + Sync {
    fn decrypt(&self, value: &str) -> std::result::Result<String, BoxError>;
}

impl<F> Decryptor for F
where
    F: Fn(&str) -> std::result::Result<String, BoxError> + Send + Sync,
{
    fn decrypt(&self, value: &str) -> std::result::Result<String, BoxError> {
        self(value)
    }
}

/// Returns the value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityDecryptor;

impl Decryptor for IdentityDecryptor {
    fn decrypt(&self, value: &str) -> std::result::Result<String, BoxError> {
        Ok(value.to_string())
    }
}

/// Named decryptors, referenced from accessor descriptors.
#[derive(Clone, Default)]
pub struct DecryptorRegistry {
    decryptors: HashMap<String, Arc<dyn Decryptor>>,
}

impl fmt::Debug for DecryptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.decryptors.keys().collect();
        names.sort();
        f.debug_struct("DecryptorRegistry")
            .field("decryptors", &names)
            .finish()
    }
}

impl DecryptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decryptor under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, decryptor: impl Decryptor + 'static) {
        self.decryptors.insert(name.into(), Arc::new(decryptor));
    }

    /// Get a decryptor by name.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn Decryptor>> {
        self.decryptors
            .get(name)
            .ok_or_else(|| Error::UnknownDecryptor {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decryptors.contains_key(name)
    }
}
