//! Data model for Typed Properties
//!
//! Every accessor on a configuration interface is described once, up front,
//! as plain data:
//!
//! - [`MethodDescriptor`] - key override, default literal, return type,
//!   parameter kinds and the features disabled for the accessor
//! - [`Arg`] - a call argument passed to an accessor
//! - [`Value`] - the typed result of converting a property string
//! - [`TargetType`] - the declared return type a property converts into
//! - [`FeatureSet`] - the disableable resolution features
//!
//! Nothing in this crate performs lookups; it is the vocabulary shared by the
//! text, conversion and core crates.

pub mod arg;
pub mod descriptor;
pub mod error;
pub mod feature;
pub mod target;
pub mod value;

pub use arg::{Arg, ArgKind};
pub use descriptor::{DurationUnit, MethodDescriptor, Signature};
pub use error::{Result, ValueError};
pub use feature::{Feature, FeatureSet};
pub use target::TargetType;
pub use value::{FromValue, Value};
