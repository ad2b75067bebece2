//! Accessor resolution for Typed Properties
//!
//! A configuration interface is declared as a [`ConfigSchema`] of accessor
//! descriptors. A [`ConfigHandler`] built over a [`PropertyStore`] answers
//! calls to those accessors:
//!
//! - default-method bodies run directly
//! - delegated methods (`reload`, `get_property`, ...) are forwarded to the
//!   store or an auxiliary [`DelegateTarget`]
//! - everything else goes through the resolution [`Pipeline`]
//!
//! ```
//! use props_core::{ConfigHandler, ConfigSchema, DefaultKeyDeriver, MemoryStore};
//! use props_meta::{Arg, ArgKind, MethodDescriptor, TargetType};
//! use std::sync::Arc;
//!
//! let schema = ConfigSchema::new("Server")
//!     .method(MethodDescriptor::new("port", TargetType::U16).with_default("8080"))
//!     .method(
//!         MethodDescriptor::new("greeting", TargetType::String).with_params([ArgKind::Str]),
//!     );
//!
//! let store = MemoryStore::new()
//!     .with_defaults(schema.defaults(&DefaultKeyDeriver::new()))
//!     .with_properties([("greeting", "Hello, %s!")]);
//!
//! let config = ConfigHandler::builder(schema, Arc::new(store)).build()?;
//!
//! assert_eq!(config.get::<u16>("port", &[])?, Some(8080));
//! assert_eq!(
//!     config.get::<String>("greeting", &[Arg::from("Ada")])?,
//!     Some("Hello, Ada!".to_string())
//! );
//! # Ok::<(), props_core::Error>(())
//! ```

pub mod decrypt;
pub mod delegate;
pub mod error;
pub mod handler;
pub mod key;
pub mod logging;
pub mod namespace;
pub mod pipeline;
pub mod preprocess;
pub mod schema;
pub mod settings;
pub mod store;

pub use decrypt::{Decryptor, DecryptorRegistry, IdentityDecryptor};
pub use delegate::{DelegateBinding, DelegateSlot, DelegateTarget, find_delegates};
pub use error::{Error, Result};
pub use handler::{ConfigHandler, ConfigHandlerBuilder};
pub use key::{DefaultKeyDeriver, KeyDeriver};
pub use namespace::{NAMESPACE_SEPARATOR, aggregate_by_pattern};
pub use pipeline::Pipeline;
pub use preprocess::{Preprocessor, PreprocessorRegistry, PreprocessorResolver, ToLowerCase, Trim};
pub use schema::{Accessor, ConfigSchema, DefaultBody};
pub use settings::Settings;
pub use store::{MemoryStore, PropertySource, PropertyStore};
