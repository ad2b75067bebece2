//! A mutable in-memory property source.

use parking_lot::Mutex;
use props_core::PropertySource;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct Shared {
    properties: Mutex<HashMap<String, String>>,
    stale: AtomicBool,
    loads: AtomicUsize,
    fail_next: Mutex<Option<String>>,
}

/// Property source whose contents a test can replace at any time.
///
/// [`TestSource::update`] marks the source stale, so the next accessor call
/// on a store built over it reloads. Clones share state.
///
/// # Example
///
/// ```rust
/// use props_core::PropertySource;
/// use props_test_utils::TestSource;
///
/// let source = TestSource::new([("port", "8080")]);
/// source.update([("port", "9090")]);
/// assert!(source.needs_reload());
/// assert_eq!(source.load().unwrap()["port"], "9090");
/// assert!(!source.needs_reload());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TestSource {
    shared: Arc<Shared>,
}

impl TestSource {
    pub fn new<const N: usize>(properties: [(&str, &str); N]) -> Self {
        let source = Self::default();
        *source.shared.properties.lock() = to_map(properties);
        source
    }

    /// Replace the contents and mark the source stale.
    pub fn update<const N: usize>(&self, properties: [(&str, &str); N]) {
        *self.shared.properties.lock() = to_map(properties);
        self.shared.stale.store(true, Ordering::SeqCst);
    }

    /// Make the next [`PropertySource::load`] fail with `message`. The
    /// source stays stale until a load succeeds.
    pub fn fail_next_load(&self, message: impl Into<String>) {
        *self.shared.fail_next.lock() = Some(message.into());
    }

    /// Number of completed loads.
    pub fn loads(&self) -> usize {
        self.shared.loads.load(Ordering::SeqCst)
    }
}

impl PropertySource for TestSource {
    fn load(&self) -> props_core::Result<HashMap<String, String>> {
        if let Some(message) = self.shared.fail_next.lock().take() {
            return Err(io::Error::other(message).into());
        }
        let properties = self.shared.properties.lock().clone();
        self.shared.stale.store(false, Ordering::SeqCst);
        self.shared.loads.fetch_add(1, Ordering::SeqCst);
        Ok(properties)
    }

    fn needs_reload(&self) -> bool {
        self.shared.stale.load(Ordering::SeqCst)
    }
}

fn to_map<const N: usize>(properties: [(&str, &str); N]) -> HashMap<String, String> {
    properties
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
