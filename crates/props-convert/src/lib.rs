//! Conversion of resolved property strings into typed values
//!
//! The [`Converter`] trait is the seam the resolution pipeline calls as its
//! last stage. [`Converters`] is the default implementation: it understands
//! every [`props_meta::TargetType`] and dispatches `Custom` types and
//! per-accessor overrides to registered [`CustomConverter`]s.
//!
//! # Example
//!
//! ```
//! use props_convert::{Converted, Converter, Converters};
//! use props_meta::{MethodDescriptor, TargetType, Value};
//!
//! let converters = Converters::new();
//! let method = MethodDescriptor::new("ports", TargetType::list(TargetType::U16));
//!
//! let converted = converters
//!     .convert(&method, method.return_type(), "80, 443")
//!     .unwrap();
//! assert_eq!(
//!     converted,
//!     Converted::Value(Value::List(vec![Value::UInt(80), Value::UInt(443)]))
//! );
//! ```

pub mod converter;
pub mod duration;
pub mod error;

pub use converter::{BoxError, Converted, Converter, Converters, CustomConverter};
pub use duration::parse_duration;
pub use error::{Error, Result};
