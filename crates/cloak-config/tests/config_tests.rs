// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Cloak configuration system.

use std::io::Write;

use cloak_config::diagnostic::ConfigError;
use cloak_config::model::CloakConfig;
use cloak_config::{
    load_and_validate_path, load_and_validate_str, load_config_from_path, load_config_from_str,
};
use cloak_core::{Environment, SourceUrl};

const FULL: &str = r#"
default_source = "docs"

[[sources]]
name = "wordpress"
url = "https://cms.example.com"
admin_path = "/wp-admin"
assets_path = "/wp-content/uploads"
[sources.meta]
api_version = 2

[[sources]]
name = "docs"
active_environment = "staging"
admin_path = "/admin"
assets_path = "/assets"
[sources.url]
local = "http://localhost:8080"
staging = "https://staging.docs.example.com"
production = "https://docs.example.com"

[cms]
[[cms.instances]]
url = "https://cms.example.com"
admin_path = "/admin"
content_path = "/content"

[[cms.instances]]
name = "blog"
url = "https://blog.example.com"
admin_path = "/"
content_path = "/posts"
"#;

#[test]
fn full_toml_deserializes_into_cloak_config() {
    let config = load_and_validate_str(FULL).expect("valid config");

    assert_eq!(config.default_source.as_deref(), Some("docs"));
    assert_eq!(config.sources.len(), 2);

    let wordpress = &config.sources[0];
    assert!(matches!(&wordpress.url, SourceUrl::Single(u) if u == "https://cms.example.com"));
    assert_eq!(wordpress.active_environment, Environment::Production);
    assert_eq!(
        wordpress.meta.as_ref().unwrap()["api_version"],
        serde_json::json!(2)
    );

    let docs = &config.sources[1];
    assert_eq!(docs.active_environment, Environment::Staging);
    match &docs.url {
        SourceUrl::PerEnvironment(urls) => {
            assert_eq!(urls.local, "http://localhost:8080");
            assert_eq!(urls.production, "https://docs.example.com");
        }
        other => panic!("expected per-environment URLs, got {other:?}"),
    }

    assert_eq!(config.cms.instances.len(), 2);
    assert!(config.cms.instances[0].name.is_none());
    assert_eq!(config.cms.instances[1].name.as_deref(), Some("blog"));
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("empty config is valid");
    assert!(config.sources.is_empty());
    assert!(config.cms.instances.is_empty());
    assert!(config.active_environment.is_none());
}

#[test]
fn top_level_environment_overrides_sources() {
    let toml = format!("active_environment = \"local\"\n{FULL}");
    let config = load_config_from_str(&toml).unwrap();
    assert!(config
        .sources
        .iter()
        .all(|s| s.active_environment == Environment::Local));
}

#[test]
fn unknown_source_key_suggests_correction() {
    let toml = r#"
[[sources]]
url = "https://cms.example.com"
admn_path = "/admin"
assets_path = "/assets"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("an unknown key error");
    assert_eq!(unknown.0, "admn_path");
    assert_eq!(unknown.1.as_deref(), Some("admin_path"));
}

#[test]
fn unknown_top_level_key_is_rejected() {
    let err = load_config_from_str("defualt_source = \"a\"\n").unwrap_err();
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("defualt_source"),
        "error should mention the bad key, got: {err_str}"
    );
}

#[test]
fn missing_required_instance_key_is_reported() {
    let toml = r#"
[[cms.instances]]
url = "https://cms.example.com"
admin_path = "/admin"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::MissingKey { key } if key.ends_with("content_path"))));
}

#[test]
fn partial_environment_table_is_rejected() {
    let toml = r#"
[[sources]]
admin_path = "/"
assets_path = "/"
[sources.url]
local = "http://localhost"
production = "https://example.com"
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn invalid_environment_name_is_rejected() {
    let toml = "active_environment = \"qa\"\n";
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn semantic_errors_are_collected() {
    let toml = r#"
default_source = "missing"

[[sources]]
name = "a"
url = "cms.example.com"
admin_path = "admin"
assets_path = "/"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

#[test]
fn missing_config_file_yields_defaults() {
    let config = load_config_from_path(std::path::Path::new("/nonexistent/cloak.toml"))
        .expect("missing file should be silently skipped");
    assert!(config.sources.is_empty());
}

#[test]
fn config_file_on_disk_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FULL.as_bytes()).unwrap();

    let config = load_and_validate_path(file.path()).expect("valid config file");
    assert_eq!(config.sources[0].name.as_deref(), Some("wordpress"));
    assert_eq!(config.cms.instances[1].content_path, "/posts");
}

#[test]
fn unknown_key_in_file_is_reported_with_suggestion() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"[[sources]]\nurl = \"https://x.example\"\nadmin_path = \"/\"\nassets_path = \"/\"\nnmae = \"x\"\n")
        .unwrap();

    let errors = load_and_validate_path(file.path()).unwrap_err();
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "nmae");
            assert_eq!(suggestion.as_deref(), Some("name"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn env_style_override_sets_default_source() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    // Equivalent to CLOAK_DEFAULT_SOURCE=docs on top of the file.
    let config: CloakConfig = Figment::new()
        .merge(Serialized::defaults(CloakConfig::default()))
        .merge(Toml::string(FULL))
        .merge(("default_source", "wordpress"))
        .extract()
        .expect("should merge env override");

    assert_eq!(config.default_source.as_deref(), Some("wordpress"));
    assert_eq!(config.sources.len(), 2);
}
