use pmservice::config::{ConfigOverrides, DEFAULT_BIND, DEFAULT_COLLECTION, ServiceConfig};
use pmservice::errors::ServiceError;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

#[test]
fn defaults() {
    let cfg = ServiceConfig::default();
    assert_eq!(cfg.bind, DEFAULT_BIND);
    assert_eq!(cfg.collection, DEFAULT_COLLECTION);
    assert!(cfg.seed_file.is_none());
}

#[test]
fn partial_toml_keeps_defaults() {
    let cfg = ServiceConfig::from_toml_str("bind = \"0.0.0.0:9000\"\nlog_level = \"debug\"\n").unwrap();
    assert_eq!(cfg.bind, "0.0.0.0:9000");
    assert_eq!(cfg.collection, DEFAULT_COLLECTION);
    assert_eq!(cfg.log_level.as_deref(), Some("debug"));
}

#[test]
fn bad_toml_is_config_error() {
    assert!(matches!(ServiceConfig::from_toml_str("bind = ["), Err(ServiceError::Config(_))));
}

#[test]
fn explicit_file_must_exist_and_parse() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "collection = \"readings\"").unwrap();
    let cfg = ServiceConfig::load(Some(f.path())).unwrap();
    assert_eq!(cfg.collection, "readings");
    assert!(ServiceConfig::load(Some(&f.path().with_extension("nope"))).is_err());
}

#[test]
fn cli_beats_env_beats_file() {
    let mut cfg = ServiceConfig::from_toml_str("bind = \"file:1\"\ncollection = \"fromfile\"\n").unwrap();
    let env: HashMap<&str, &str> = [
        ("PMSERVICE_BIND", "env:2"),
        ("PMSERVICE_SEED", "/tmp/seed.ndjson"),
        ("PMSERVICE_LOG_RETENTION", "3"),
    ]
    .into_iter()
    .collect();
    cfg.apply_env_from(|k| env.get(k).map(|s| (*s).to_string()));
    assert_eq!(cfg.bind, "env:2");
    assert_eq!(cfg.collection, "fromfile");
    assert_eq!(cfg.seed_file, Some(PathBuf::from("/tmp/seed.ndjson")));
    assert_eq!(cfg.log_retention, Some(3));

    cfg.apply_overrides(ConfigOverrides { bind: Some("cli:3".into()), ..ConfigOverrides::default() });
    assert_eq!(cfg.bind, "cli:3");
    assert_eq!(cfg.seed_file, Some(PathBuf::from("/tmp/seed.ndjson")));
}
