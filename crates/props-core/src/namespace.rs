//! Namespace aggregation
//!
//! When a key resolves to nothing (or only to its default), the key is
//! retried as a regular expression over every property name. Matches are
//! rendered as `name->value` and joined with [`NAMESPACE_SEPARATOR`].

use crate::settings::Settings;
use crate::store::PropertyStore;
use rayon::prelude::*;
use regex::Regex;

/// Separator between aggregated `name->value` entries.
pub const NAMESPACE_SEPARATOR: &str = ";;";

/// Aggregate every property whose name fully matches `pattern`.
///
/// The key named exactly `pattern` is never part of its own aggregate.
/// Returns `prior` when the pattern is not a valid regex or matches nothing.
/// The order of entries is unspecified.
pub fn aggregate_by_pattern(
    store: &dyn PropertyStore,
    pattern: &str,
    prior: Option<String>,
    settings: &Settings,
) -> Option<String> {
    let matcher = match Regex::new(&format!("^(?:{})$", pattern)) {
        Ok(matcher) => matcher,
        Err(e) => {
            tracing::trace!(pattern, error = %e, "Key is not a usable namespace pattern");
            return prior;
        }
    };

    let names = store.property_names();
    let entry = |name: &String| -> Option<String> {
        if name == pattern || !matcher.is_match(name) {
            return None;
        }
        store
            .get_property(name)
            .map(|value| format!("{}->{}", name, value))
    };

    let entries: Vec<String> = if names.len() >= settings.namespace_parallel_threshold {
        names.par_iter().filter_map(entry).collect()
    } else {
        names.iter().filter_map(entry).collect()
    };

    if entries.is_empty() {
        return prior;
    }

    tracing::debug!(pattern, matches = entries.len(), "Aggregated namespace");
    Some(entries.join(NAMESPACE_SEPARATOR))
}
