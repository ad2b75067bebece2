//! Ready-made schemas shared across test suites.

use props_core::ConfigSchema;
use props_meta::{ArgKind, DurationUnit, MethodDescriptor, TargetType};

/// A small server configuration touching every pipeline stage.
///
/// | accessor            | key                    | notes                       |
/// |---------------------|------------------------|-----------------------------|
/// | `port()`            | `server.port`          | default `8080`              |
/// | `host()`            | `server.host`          | trimmed                     |
/// | `timeout()`         | `server.timeout`       | duration, seconds, default 30 |
/// | `greeting(str)`     | `greeting`             | formatted with the argument |
/// | `url()`             | `service.${env}.url`   | expanded key                |
/// | `password()`        | `db.password`          | encrypted                   |
/// | `tags()`            | `tags`                 | list of strings             |
/// | `level()`           | `log.level`            | enum, lower-cased           |
/// | `endpoint(str)`     | `endpoint.%s`          | key formatted with argument |
pub fn server_schema() -> ConfigSchema {
    ConfigSchema::new("ServerConfig")
        .method(
            MethodDescriptor::new("port", TargetType::U16)
                .with_key("server.port")
                .with_default("8080"),
        )
        .method(
            MethodDescriptor::new("host", TargetType::String)
                .with_key("server.host")
                .with_preprocessor("trim"),
        )
        .method(
            MethodDescriptor::new("timeout", TargetType::Duration)
                .with_key("server.timeout")
                .with_duration_unit(DurationUnit::Seconds)
                .with_default("30"),
        )
        .method(
            MethodDescriptor::new("greeting", TargetType::String).with_params([ArgKind::Str]),
        )
        .method(MethodDescriptor::new("url", TargetType::String).with_key("service.${env}.url"))
        .method(
            MethodDescriptor::new("password", TargetType::String)
                .with_key("db.password")
                .encrypted(),
        )
        .method(MethodDescriptor::new("tags", TargetType::list(TargetType::String)))
        .method(
            MethodDescriptor::new("level", TargetType::enumeration(["debug", "info", "warn"]))
                .with_key("log.level")
                .with_preprocessor("to_lower_case"),
        )
        .method(
            MethodDescriptor::new("endpoint", TargetType::String)
                .with_key("endpoint.%s")
                .with_params([ArgKind::Str]),
        )
}
