//! Property key derivation

use props_meta::MethodDescriptor;

/// Derives the canonical (unexpanded) property key of an accessor.
pub trait KeyDeriver: Send + Sync {
    fn canonical_key(&self, method: &MethodDescriptor) -> String;
}

/// Uses the explicit key override, else the accessor name, optionally
/// behind a fixed prefix.
#[derive(Debug, Clone, Default)]
pub struct DefaultKeyDeriver {
    prefix: Option<String>,
}

impl DefaultKeyDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `prefix` to every derived key (e.g. `"app."`).
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl KeyDeriver for DefaultKeyDeriver {
    fn canonical_key(&self, method: &MethodDescriptor) -> String {
        let base = method.explicit_key().unwrap_or(method.name());
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, base),
            None => base.to_string(),
        }
    }
}
