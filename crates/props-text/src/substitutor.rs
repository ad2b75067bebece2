//! `${name}` variable substitution
//!
//! The substitutor is built once from a snapshot of the property map and is
//! read-only afterwards, so one instance is shared by every thread resolving
//! accessors on the same configuration.

use props_meta::Arg;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for `${name}` references.
static VARIABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.+?)\}").expect("Invalid variable regex"));

/// Default limit on nested expansion.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Expands `${name}` references against an immutable property snapshot.
///
/// - names found in the snapshot expand to their value, itself expanded
/// - with [`Substitutor::replace_with`], numeric names fall back to call
///   arguments (`${0}` is the first argument)
/// - anything else expands to the empty string
///
/// # Example
///
/// ```
/// use props_meta::Arg;
/// use props_text::Substitutor;
/// use std::collections::HashMap;
///
/// let snapshot = HashMap::from([
///     ("env".to_string(), "prod".to_string()),
///     ("host".to_string(), "${env}.example.com".to_string()),
/// ]);
/// let substitutor = Substitutor::new(snapshot);
///
/// assert_eq!(substitutor.replace("https://${host}/"), "https://prod.example.com/");
/// assert_eq!(
///     substitutor.replace_with("user.${0}.name", &[Arg::from("alice")]),
///     "user.alice.name"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Substitutor {
    values: HashMap<String, String>,
    max_depth: usize,
}

impl Substitutor {
    /// Build a substitutor over a snapshot of the property map.
    pub fn new(values: HashMap<String, String>) -> Self {
        Self {
            values,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how deeply referenced values are themselves expanded.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Number of entries in the snapshot.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `text` contains at least one `${...}` reference.
    pub fn has_variables(text: &str) -> bool {
        VARIABLE_REGEX.is_match(text)
    }

    /// Expand references using the snapshot only.
    pub fn replace(&self, template: &str) -> String {
        self.replace_with(template, &[])
    }

    /// Expand references, consulting `aux` for numeric names the snapshot
    /// does not define.
    pub fn replace_with(&self, template: &str, aux: &[Arg]) -> String {
        let mut visiting = Vec::new();
        self.expand(template, aux, &mut visiting)
    }

    fn expand(&self, template: &str, aux: &[Arg], visiting: &mut Vec<String>) -> String {
        if !template.contains("${") {
            return template.to_string();
        }

        let mut out = String::with_capacity(template.len());
        let mut last = 0;
        for caps in VARIABLE_REGEX.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&template[last..whole.start()]);
            out.push_str(&self.lookup(name.as_str(), aux, visiting));
            last = whole.end();
        }
        out.push_str(&template[last..]);
        out
    }

    fn lookup(&self, name: &str, aux: &[Arg], visiting: &mut Vec<String>) -> String {
        if let Some(value) = self.values.get(name) {
            if visiting.iter().any(|v| v == name) {
                tracing::warn!(variable = %name, chain = ?visiting, "Cyclic variable reference");
                return String::new();
            }
            if visiting.len() >= self.max_depth {
                tracing::warn!(variable = %name, depth = visiting.len(), "Variable nesting too deep");
                return String::new();
            }
            visiting.push(name.to_string());
            let expanded = self.expand(value, aux, visiting);
            visiting.pop();
            return expanded;
        }

        if let Some(arg) = name.parse::<usize>().ok().and_then(|i| aux.get(i)) {
            return arg.to_string();
        }

        tracing::trace!(variable = %name, "Undefined variable expands to empty string");
        String::new()
    }
}
