//! Counting stand-ins for pipeline collaborators.
//!
//! Each spy is `Clone` and clones share one counter, so a test can hand one
//! copy to the store or handler and keep another for assertions.

use props_convert::{BoxError, Converted, Converter, Converters};
use props_core::{Decryptor, Preprocessor};
use props_meta::{MethodDescriptor, TargetType};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Decryptor that returns its input and counts calls.
#[derive(Debug, Clone, Default)]
pub struct SpyDecryptor {
    calls: Arc<AtomicUsize>,
}

impl SpyDecryptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Decryptor for SpyDecryptor {
    fn decrypt(&self, value: &str) -> Result<String, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(value.to_string())
    }
}

/// Preprocessor that returns its input and counts calls.
#[derive(Debug, Clone, Default)]
pub struct SpyPreprocessor {
    calls: Arc<AtomicUsize>,
}

impl SpyPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Preprocessor for SpyPreprocessor {
    fn process(&self, input: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        input.to_string()
    }
}

/// Wraps [`Converters`] and counts calls.
#[derive(Debug, Clone, Default)]
pub struct SpyConverter {
    inner: Converters,
    calls: Arc<AtomicUsize>,
}

impl SpyConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wrapping(inner: Converters) -> Self {
        Self {
            inner,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Converter for SpyConverter {
    fn convert(
        &self,
        method: &MethodDescriptor,
        target: &TargetType,
        text: &str,
    ) -> props_convert::Result<Converted> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.convert(method, target, text)
    }
}
