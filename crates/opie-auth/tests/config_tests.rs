// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use opie_auth::config::{
    self, ConfigError, DEFAULT_MAX_SEQUENCE, DEFAULT_RETRIES, DEFAULT_SEED_LENGTH,
};
use tempfile::TempDir;

const WITH_DEFAULTS: &str = r#"{
    "defaults": {
        "maxseq": 99,
        "passphrase": "defaultpassphrase",
        "retries": 3,
        "seedlen": 6
    },
    "users": [
        { "name": "alldefaults" },
        {
            "name": "allset",
            "maxseq": 7331,
            "passphrase": "testpassphrase",
            "retries": 42,
            "seedlen": 9
        }
    ]
}"#;

const WITHOUT_DEFAULTS: &str = r#"{
    "users": [
        { "name": "alldefaults", "passphrase": "testpassphrase" }
    ]
}"#;

const WITHOUT_PASSPHRASE: &str = r#"{
    "users": [
        { "name": "alldefaults" }
    ]
}"#;

fn write_config(dir: &TempDir, contents: &str, mode: u32) -> PathBuf {
    let path = dir.path().join("opie.json");
    fs::write(&path, contents).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
    path
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = config::load_user_config("alldefaults", &dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn invalid_json_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "invalidjson", 0o600);
    let err = config::load_user_config("alldefaults", &path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn permissive_mode_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "{}", 0o604);
    let err = config::load_user_config("alldefaults", &path).unwrap_err();
    assert!(matches!(err, ConfigError::TooPermissive { mode: 0o604 }));
}

#[test]
fn hardcoded_defaults_apply() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, WITHOUT_DEFAULTS, 0o600);
    let cfg = config::load_user_config("alldefaults", &path).unwrap();

    assert_eq!(cfg.name, "alldefaults");
    assert_eq!(cfg.max_sequence, DEFAULT_MAX_SEQUENCE);
    assert_eq!(cfg.retries, DEFAULT_RETRIES);
    assert_eq!(cfg.seed_length, DEFAULT_SEED_LENGTH);
    assert_eq!(cfg.passphrase, "testpassphrase");
}

#[test]
fn missing_passphrase_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, WITHOUT_PASSPHRASE, 0o600);
    let err = config::load_user_config("alldefaults", &path).unwrap_err();
    assert!(matches!(err, ConfigError::MissingPassphrase));
}

#[test]
fn file_defaults_and_user_overrides_resolve() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, WITH_DEFAULTS, 0o600);

    let cfg = config::load_user_config("alldefaults", &path).unwrap();
    assert_eq!(cfg.max_sequence, 99);
    assert_eq!(cfg.passphrase, "defaultpassphrase");
    assert_eq!(cfg.retries, 3);
    assert_eq!(cfg.seed_length, 6);

    let cfg = config::load_user_config("allset", &path).unwrap();
    assert_eq!(cfg.max_sequence, 7331);
    assert_eq!(cfg.passphrase, "testpassphrase");
    assert_eq!(cfg.retries, 42);
    assert_eq!(cfg.seed_length, 9);
}

#[test]
fn unknown_user_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, WITH_DEFAULTS, 0o600);
    let err = config::load_user_config("nosuchuser", &path).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownUser));
}

#[test]
fn debug_output_redacts_passphrase() {
    let cfg = config::user_config_from_str("alldefaults", WITHOUT_DEFAULTS).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(rendered.contains("[REDACTED]"));
    assert!(!rendered.contains("testpassphrase"));
}
