//! Delegate dispatch
//!
//! Some accessors are not properties at all: `reload()`, `property_names()`,
//! `set_property(key, value)` and the like are forwarded verbatim to an
//! object that implements them. Two objects can take such calls: the
//! property store and an optional auxiliary target supplied by the embedding
//! application (for example a management endpoint).
//!
//! The binding list is plain data, `(slot, signature)` pairs, so it can be
//! thrown away and recomputed from the two targets at any time.

use crate::{Error, Result};
use props_meta::{Arg, MethodDescriptor, Signature, Value};

/// An object that accepts forwarded accessor calls.
pub trait DelegateTarget: Send + Sync {
    /// Signatures of the methods this target handles.
    fn delegate_signatures(&self) -> Vec<Signature> {
        Vec::new()
    }

    /// Run a delegated method. Errors propagate to the caller unchanged.
    fn call_delegate(&self, signature: &Signature, _args: &[Arg]) -> Result<Option<Value>> {
        Err(Error::UnsupportedDelegate {
            signature: signature.to_string(),
        })
    }
}

/// Which target a binding forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelegateSlot {
    Store,
    Auxiliary,
}

/// A delegated method bound to its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateBinding {
    pub slot: DelegateSlot,
    pub signature: Signature,
}

impl DelegateBinding {
    /// Whether the accessor has the same signature as the delegated method.
    pub fn matches(&self, method: &MethodDescriptor) -> bool {
        self.signature.name == method.name() && self.signature.params == method.params()
    }
}

/// Collect the bindings of both targets, store first.
///
/// Calling this twice on the same targets yields the same list.
pub fn find_delegates(
    store: &dyn DelegateTarget,
    auxiliary: Option<&dyn DelegateTarget>,
) -> Vec<DelegateBinding> {
    let mut bindings: Vec<DelegateBinding> = store
        .delegate_signatures()
        .into_iter()
        .map(|signature| DelegateBinding {
            slot: DelegateSlot::Store,
            signature,
        })
        .collect();

    if let Some(auxiliary) = auxiliary {
        bindings.extend(
            auxiliary
                .delegate_signatures()
                .into_iter()
                .map(|signature| DelegateBinding {
                    slot: DelegateSlot::Auxiliary,
                    signature,
                }),
        );
    }

    tracing::trace!(count = bindings.len(), "Delegate bindings computed");
    bindings
}
