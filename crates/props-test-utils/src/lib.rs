//! Shared test utilities for the Typed Properties workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`spy`]: counting decryptor, preprocessor and converter, used to prove
//!   which pipeline stages ran
//! - [`source`]: an in-memory [`PropertySource`](props_core::PropertySource)
//!   whose contents can change between loads
//! - [`fixtures`]: ready-made schemas

pub mod fixtures;
pub mod source;
pub mod spy;

pub use source::TestSource;
pub use spy::{SpyConverter, SpyDecryptor, SpyPreprocessor};
