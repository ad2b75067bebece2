//! End-to-end test of a typed configuration facade
//!
//! `ServerConfig` is what an application writes on top of a
//! [`ConfigHandler`]: one method per accessor, each returning a Rust type.

use pretty_assertions::assert_eq;
use props_convert::BoxError;
use props_core::{
    ConfigHandler, DefaultKeyDeriver, DelegateTarget, MemoryStore, PropertyStore, Result,
};
use props_meta::{Arg, MethodDescriptor, Signature, TargetType, Value};
use props_test_utils::{TestSource, fixtures};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

struct ServerConfig {
    handler: ConfigHandler,
}

impl ServerConfig {
    fn port(&self) -> Result<u16> {
        Ok(self.handler.get("port", &[])?.unwrap_or_default())
    }

    fn host(&self) -> Result<Option<String>> {
        self.handler.get("host", &[])
    }

    fn timeout(&self) -> Result<Duration> {
        Ok(self.handler.get("timeout", &[])?.unwrap_or_default())
    }

    fn greeting(&self, name: &str) -> Result<Option<String>> {
        self.handler.get("greeting", &[Arg::from(name)])
    }

    fn url(&self) -> Result<Option<String>> {
        self.handler.get("url", &[])
    }

    fn password(&self) -> Result<Option<String>> {
        self.handler.get("password", &[])
    }

    fn tags(&self) -> Result<Vec<String>> {
        Ok(self.handler.get("tags", &[])?.unwrap_or_default())
    }

    fn endpoint(&self, region: &str) -> Result<Option<String>> {
        self.handler.get("endpoint", &[Arg::from(region)])
    }

    fn reload(&self) -> Result<()> {
        self.handler.invoke("reload", &[]).map(|_| ())
    }

    fn describe(&self) -> Result<String> {
        Ok(self.handler.get("describe", &[])?.unwrap_or_default())
    }
}

/// Admin hook answering `maintenance()`.
#[derive(Default)]
struct Admin {
    maintenance: AtomicBool,
}

impl DelegateTarget for Admin {
    fn delegate_signatures(&self) -> Vec<Signature> {
        vec![Signature::new("maintenance", [])]
    }

    fn call_delegate(&self, _: &Signature, _: &[Arg]) -> Result<Option<Value>> {
        Ok(Some(Value::Bool(self.maintenance.load(Ordering::SeqCst))))
    }
}

fn rot13(value: &str) -> std::result::Result<String, BoxError> {
    Ok(value
        .chars()
        .map(|c| match c {
            'a'..='z' => (((c as u8 - b'a') + 13) % 26 + b'a') as char,
            'A'..='Z' => (((c as u8 - b'A') + 13) % 26 + b'A') as char,
            _ => c,
        })
        .collect())
}

fn setup(source: TestSource, admin: Arc<Admin>) -> (ServerConfig, Arc<MemoryStore>) {
    let schema = fixtures::server_schema()
        .method(MethodDescriptor::new("maintenance", TargetType::Bool))
        .default_method(
            MethodDescriptor::new("describe", TargetType::String),
            |config: &ConfigHandler, _: &[Arg]| {
                let host = config.get::<String>("host", &[])?.unwrap_or_default();
                let port = config.get::<u16>("port", &[])?.unwrap_or_default();
                Ok(Some(Value::Str(format!("{}:{}", host, port))))
            },
        )
        .with_reloadable();

    let store = Arc::new(
        MemoryStore::new()
            .with_defaults(schema.defaults(&DefaultKeyDeriver::new()))
            .with_default_decryptor(rot13)
            .with_source(source)
            .unwrap(),
    );

    let handler = ConfigHandler::builder(schema, store.clone())
        .auxiliary(admin)
        .build()
        .unwrap();

    (ServerConfig { handler }, store)
}

fn source() -> TestSource {
    TestSource::new([
        ("server.host", "  api.example.org "),
        ("env", "staging"),
        ("service.staging.url", "https://${server.region}.example.org"),
        ("server.region", "eu"),
        ("db.password", "uhagre2"),
        ("greeting", "Hello, %s!"),
        ("tags", "blue,green"),
        ("endpoint.eu", "https://eu.api"),
    ])
}

#[test]
fn test_typed_facade() {
    let (config, _) = setup(source(), Arc::new(Admin::default()));

    assert_eq!(config.port().unwrap(), 8080);
    assert_eq!(config.host().unwrap().as_deref(), Some("api.example.org"));
    assert_eq!(config.timeout().unwrap(), Duration::from_secs(30));
    assert_eq!(config.greeting("Ada").unwrap().as_deref(), Some("Hello, Ada!"));
    assert_eq!(
        config.url().unwrap().as_deref(),
        Some("https://eu.example.org")
    );
    assert_eq!(config.password().unwrap().as_deref(), Some("hunter2"));
    assert_eq!(config.tags().unwrap(), vec!["blue", "green"]);
    assert_eq!(config.endpoint("eu").unwrap().as_deref(), Some("https://eu.api"));
    assert_eq!(config.endpoint("us").unwrap(), None);
}

#[test]
fn test_default_method_sees_other_accessors() {
    let (config, _) = setup(source(), Arc::new(Admin::default()));
    assert_eq!(config.describe().unwrap(), "api.example.org:8080");
}

#[test]
fn test_auxiliary_target() {
    let admin = Arc::new(Admin::default());
    let (config, _) = setup(source(), Arc::clone(&admin));

    assert_eq!(config.handler.get::<bool>("maintenance", &[]).unwrap(), Some(false));
    admin.maintenance.store(true, Ordering::SeqCst);
    assert_eq!(config.handler.get::<bool>("maintenance", &[]).unwrap(), Some(true));
}

#[test]
fn test_source_update_picked_up() {
    let source = source();
    let (config, store) = setup(source.clone(), Arc::new(Admin::default()));
    assert_eq!(config.port().unwrap(), 8080);

    source.update([("server.port", "9443"), ("server.host", "new.example.org")]);

    assert_eq!(config.port().unwrap(), 9443);
    assert_eq!(config.host().unwrap().as_deref(), Some("new.example.org"));
    // Keys gone from the source fall back to defaults or disappear.
    assert_eq!(config.greeting("Ada").unwrap(), None);
    assert_eq!(config.timeout().unwrap(), Duration::from_secs(30));
    assert_eq!(store.reload_count(), 1);
}

#[test]
fn test_explicit_reload() {
    let (config, store) = setup(source(), Arc::new(Admin::default()));
    store.clear();
    assert_eq!(store.property_names().len(), 0);

    config.reload().unwrap();

    assert_eq!(config.host().unwrap().as_deref(), Some("api.example.org"));
    assert_eq!(config.port().unwrap(), 8080);
}

#[test]
fn test_clone_shares_state() {
    let (config, store) = setup(source(), Arc::new(Admin::default()));
    let other = ServerConfig {
        handler: config.handler.clone(),
    };

    store.set_property("server.port", "1234");
    assert_eq!(config.port().unwrap(), 1234);
    assert_eq!(other.port().unwrap(), 1234);
}
