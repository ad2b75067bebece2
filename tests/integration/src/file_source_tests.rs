//! Properties and resolver settings read from TOML files on disk.

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use props_core::{
    ConfigHandler, ConfigSchema, DefaultKeyDeriver, Error, MemoryStore, PropertySource, Result,
    Settings,
};
use props_meta::{ArgKind, MethodDescriptor, TargetType, Value};
use rstest::rstest;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Flat TOML file of string, integer and boolean keys. Nested tables are
/// flattened with `.`.
struct TomlFileSource {
    path: PathBuf,
    last: Mutex<Option<String>>,
}

impl TomlFileSource {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: Mutex::new(None),
        }
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::Table(inner) => flatten(&key, inner, out),
            toml::Value::String(s) => {
                out.insert(key, s.clone());
            }
            other => {
                out.insert(key, other.to_string());
            }
        }
    }
}

impl PropertySource for TomlFileSource {
    fn load(&self) -> Result<HashMap<String, String>> {
        let content = fs::read_to_string(&self.path)?;
        let table: toml::Table = toml::from_str(&content)?;
        let mut properties = HashMap::new();
        flatten("", &table, &mut properties);
        *self.last.lock() = Some(content);
        Ok(properties)
    }

    fn needs_reload(&self) -> bool {
        let current = fs::read_to_string(&self.path).ok();
        *self.last.lock() != current
    }
}

fn schema() -> ConfigSchema {
    ConfigSchema::new("App")
        .method(
            MethodDescriptor::new("port", TargetType::U16)
                .with_key("server.port")
                .with_default("8080"),
        )
        .method(MethodDescriptor::new("debug", TargetType::Bool).with_key("server.debug"))
        .method(
            MethodDescriptor::new("cache_dir", TargetType::Path).with_key("paths.cache"),
        )
        .method(
            MethodDescriptor::new("plugin", TargetType::String)
                .with_key("plugins.%s.version")
                .with_params([ArgKind::Str]),
        )
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn handler(path: &Path, settings: Settings) -> ConfigHandler {
    let schema = schema();
    let store = MemoryStore::new()
        .with_defaults(schema.defaults(&DefaultKeyDeriver::new()))
        .with_source(TomlFileSource::new(path))
        .unwrap();
    ConfigHandler::builder(schema, Arc::new(store))
        .settings(settings)
        .build()
        .unwrap()
}

#[test]
fn test_values_from_file() {
    let temp = TempDir::new().unwrap();
    let path = write(
        temp.path(),
        "app.toml",
        r#"
[server]
port = 9000
debug = true

[paths]
cache = "/var/cache/app"

[plugins.lint]
version = "1.2.0"
"#,
    );
    let config = handler(&path, Settings::default());

    assert_eq!(config.get::<u16>("port", &[]).unwrap(), Some(9000));
    assert_eq!(config.get::<bool>("debug", &[]).unwrap(), Some(true));
    assert_eq!(
        config.get::<PathBuf>("cache_dir", &[]).unwrap(),
        Some(PathBuf::from("/var/cache/app"))
    );
    assert_eq!(
        config.invoke("plugin", &["lint".into()]).unwrap(),
        Some(Value::Str("1.2.0".to_string()))
    );
}

#[test]
fn test_file_edit_triggers_reload() {
    let temp = TempDir::new().unwrap();
    let path = write(temp.path(), "app.toml", "[server]\nport = 9000\n");
    let config = handler(&path, Settings::default());
    assert_eq!(config.get::<u16>("port", &[]).unwrap(), Some(9000));

    write(temp.path(), "app.toml", "[server]\ndebug = false\n");

    assert_eq!(config.get::<u16>("port", &[]).unwrap(), Some(8080));
    assert_eq!(config.get::<bool>("debug", &[]).unwrap(), Some(false));
}

#[test]
fn test_broken_file_surfaces_on_reload() {
    let temp = TempDir::new().unwrap();
    let path = write(temp.path(), "app.toml", "[server]\nport = 9000\n");
    let config = handler(&path, Settings::default());

    write(temp.path(), "app.toml", "[server\nport = ");

    let err = config.get::<u16>("port", &[]).unwrap_err();
    assert!(matches!(err, Error::Reload { .. }));

    // The file stays stale until it parses again.
    write(temp.path(), "app.toml", "[server]\nport = 9001\n");
    assert_eq!(config.get::<u16>("port", &[]).unwrap(), Some(9001));
}

#[rstest]
#[case::sequential("namespace_parallel_threshold = 1000000")]
#[case::parallel("namespace_parallel_threshold = 0")]
fn test_settings_file_drives_aggregation(#[case] settings_toml: &str) {
    let temp = TempDir::new().unwrap();
    let path = write(
        temp.path(),
        "app.toml",
        "[plugins.lint]\nversion = \"1\"\n[plugins.fmt]\nversion = \"2\"\n",
    );
    let settings_path = write(temp.path(), "resolver.toml", settings_toml);
    let config = handler(&path, Settings::load(&settings_path).unwrap());

    // `plugins.[a-z]+.version` is a pattern, not a key.
    let joined = config
        .get::<String>("plugin", &["[a-z]+".into()])
        .unwrap()
        .unwrap();
    let mut parts: Vec<&str> = joined.split(props_core::NAMESPACE_SEPARATOR).collect();
    parts.sort();
    assert_eq!(
        parts,
        vec!["plugins.fmt.version->2", "plugins.lint.version->1"]
    );
}
