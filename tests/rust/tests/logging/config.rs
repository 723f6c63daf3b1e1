use msutils_core::domain::env_keys;
use msutils_core::{Error, LogFormat, LoggerConfig, RotationPolicy};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::path::PathBuf;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn environment_overrides_defaults() {
    let config = LoggerConfig::from_lookup(lookup(&[
        (env_keys::DIR, "/srv/app/logs"),
        (env_keys::ROTATION, "daily"),
        (env_keys::MAX_FILES, "7"),
        (env_keys::FORMAT, "json"),
        (env_keys::COMPRESS, "true"),
    ]))
    .unwrap();

    assert_eq!(config.log_dir, PathBuf::from("/srv/app/logs"));
    assert_eq!(config.rotation, RotationPolicy::Daily);
    assert_eq!(config.max_files, 7);
    assert_eq!(config.format, LogFormat::Json);
    assert!(config.compress);
    assert_eq!(config.access_file, "access.log");
}

#[test]
fn bad_values_name_the_variable() {
    let err = LoggerConfig::from_lookup(lookup(&[(env_keys::MAX_FILES, "lots")])).unwrap_err();
    match err {
        Error::Config { key, value } => {
            assert_eq!(key, env_keys::MAX_FILES);
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn config_deserializes_with_defaults() {
    let config: LoggerConfig = serde_json::from_value(serde_json::json!({
        "log_dir": "/tmp/x",
        "rotation": {"kind": "size", "max_bytes": 1024}
    }))
    .unwrap();
    assert_eq!(config.rotation, RotationPolicy::Size { max_bytes: 1024 });
    assert_eq!(config.error_file, "error.log");
}
