//! Text services for Typed Properties
//!
//! - [`format()`] renders printf-style templates against call arguments,
//!   independent of any locale.
//! - [`Substitutor`] expands `${name}` references against an immutable
//!   snapshot of the property map.

pub mod error;
pub mod format;
pub mod substitutor;

pub use error::{FormatError, Result};
pub use format::format;
pub use substitutor::Substitutor;
