//! Delegate forwarding and default-method bodies.

use pretty_assertions::assert_eq;
use props_core::{
    ConfigHandler, ConfigSchema, DelegateSlot, DelegateTarget, Error, MemoryStore, PropertyStore,
};
use props_meta::{Arg, ArgKind, MethodDescriptor, Signature, TargetType, Value};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Management endpoint exposing a call counter and a failing method.
#[derive(Default)]
struct Management {
    pings: AtomicUsize,
}

impl DelegateTarget for Management {
    fn delegate_signatures(&self) -> Vec<Signature> {
        vec![
            Signature::new("ping", []),
            Signature::new("fail", [ArgKind::Str]),
        ]
    }

    fn call_delegate(&self, signature: &Signature, args: &[Arg]) -> props_core::Result<Option<Value>> {
        match signature.name.as_str() {
            "ping" => {
                let n = self.pings.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Some(Value::UInt(n as u64)))
            }
            _ => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("refused: {}", args[0]),
            )
            .into()),
        }
    }
}

fn schema() -> ConfigSchema {
    ConfigSchema::new("Managed")
        .method(MethodDescriptor::new("name", TargetType::String))
        .method(MethodDescriptor::new("ping", TargetType::U64))
        .method(MethodDescriptor::new("fail", TargetType::String).with_params([ArgKind::Str]))
        .with_accessible()
        .with_mutable()
        .with_reloadable()
}

fn handler(store: Arc<MemoryStore>, management: Arc<Management>) -> ConfigHandler {
    ConfigHandler::builder(schema(), store)
        .auxiliary(management)
        .build()
        .unwrap()
}

#[test]
fn auxiliary_methods_are_forwarded() {
    let management = Arc::new(Management::default());
    let handler = handler(Arc::new(MemoryStore::new()), Arc::clone(&management));

    assert_eq!(handler.get::<u64>("ping", &[]).unwrap(), Some(1));
    assert_eq!(handler.get::<u64>("ping", &[]).unwrap(), Some(2));
    assert_eq!(management.pings.load(Ordering::SeqCst), 2);
}

#[test]
fn delegate_errors_propagate_unchanged() {
    let handler = handler(
        Arc::new(MemoryStore::new()),
        Arc::new(Management::default()),
    );
    let err = handler.invoke("fail", &[Arg::from("now")]).unwrap_err();
    assert!(
        matches!(&err, Error::Io(e) if e.kind() == io::ErrorKind::PermissionDenied && e.to_string() == "refused: now")
    );
}

#[test]
fn store_bindings_precede_auxiliary() {
    let handler = handler(
        Arc::new(MemoryStore::new()),
        Arc::new(Management::default()),
    );
    let slots: Vec<DelegateSlot> = handler.delegates().iter().map(|b| b.slot).collect();

    let first_aux = slots
        .iter()
        .position(|s| *s == DelegateSlot::Auxiliary)
        .unwrap();
    assert!(slots[..first_aux].iter().all(|s| *s == DelegateSlot::Store));
    assert!(slots[first_aux..].iter().all(|s| *s == DelegateSlot::Auxiliary));
}

#[test]
fn mutation_through_delegates_is_visible_to_store() {
    let store = Arc::new(MemoryStore::new().with_properties([("name", "before")]));
    let handler = handler(Arc::clone(&store), Arc::new(Management::default()));

    let previous = handler
        .invoke("set_property", &[Arg::from("name"), Arg::from("after")])
        .unwrap();

    assert_eq!(previous, Some(Value::Str("before".to_string())));
    assert_eq!(store.get_property("name").as_deref(), Some("after"));
    assert_eq!(
        handler.get::<String>("name", &[]).unwrap().as_deref(),
        Some("after")
    );
}

#[test]
fn property_names_are_sorted() {
    let store = Arc::new(MemoryStore::new().with_properties([("b", "2"), ("a", "1")]));
    let handler = handler(store, Arc::new(Management::default()));

    assert_eq!(
        handler.get::<Vec<String>>("property_names", &[]).unwrap(),
        Some(vec!["a".to_string(), "b".to_string()])
    );
}

#[test]
fn cloned_handler_forwards_to_same_targets() {
    let management = Arc::new(Management::default());
    let original = handler(Arc::new(MemoryStore::new()), Arc::clone(&management));
    let cloned = original.clone();

    original.invoke("ping", &[]).unwrap();
    cloned.invoke("ping", &[]).unwrap();

    assert_eq!(management.pings.load(Ordering::SeqCst), 2);
    assert_eq!(original.delegates(), cloned.delegates());
}

#[test]
fn default_method_bypasses_pipeline_and_delegates() {
    let schema = ConfigSchema::new("Greeter")
        .method(MethodDescriptor::new("name", TargetType::String))
        .default_method(
            // Same signature as a store delegate; the body still wins.
            MethodDescriptor::new("get_property", TargetType::String).with_params([ArgKind::Str]),
            |_: &ConfigHandler, args: &[Arg]| Ok(Some(Value::Str(format!("body:{}", args[0])))),
        )
        .default_method(
            MethodDescriptor::new("welcome", TargetType::String),
            |config: &ConfigHandler, _: &[Arg]| {
                let name = config.get::<String>("name", &[])?.unwrap_or_default();
                Ok(Some(Value::Str(format!("Welcome, {}", name))))
            },
        );
    let store = MemoryStore::new().with_properties([("name", "Ada"), ("welcome", "ignored")]);
    let handler = ConfigHandler::builder(schema, Arc::new(store)).build().unwrap();

    assert_eq!(
        handler.get::<String>("welcome", &[]).unwrap().as_deref(),
        Some("Welcome, Ada")
    );
    assert_eq!(
        handler
            .get::<String>("get_property", &[Arg::from("name")])
            .unwrap()
            .as_deref(),
        Some("body:name")
    );
}

#[test]
fn accessor_signature_must_match_delegate() {
    // `get_property(int)` is not a store method, so it resolves as a property.
    let schema = ConfigSchema::new("S").method(
        MethodDescriptor::new("get_property", TargetType::String).with_params([ArgKind::Int]),
    );
    let store = MemoryStore::new().with_properties([("get_property", "from-pipeline")]);
    let handler = ConfigHandler::builder(schema, Arc::new(store)).build().unwrap();

    assert_eq!(
        handler
            .get::<String>("get_property", &[Arg::from(1_i32)])
            .unwrap()
            .as_deref(),
        Some("from-pipeline")
    );
}
