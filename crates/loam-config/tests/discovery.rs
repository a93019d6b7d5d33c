use std::path::PathBuf;

use loam_config::{
    discover_config_path, load_for_workspace, ConfigError, LoamConfig, LOAM_CONFIG_ENV_VAR,
};
use loam_test_utils::{env_lock, EnvVarGuard};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn discovers_loam_toml_in_workspace_root() {
    let _lock = env_lock();
    let _env = EnvVarGuard::remove(LOAM_CONFIG_ENV_VAR);

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("loam.toml");
    std::fs::write(&config_path, "[logging]\nlevel = \"debug\"\n").unwrap();

    let discovered = discover_config_path(dir.path()).expect("loam.toml is discovered");
    assert_eq!(discovered, config_path.canonicalize().unwrap_or(config_path));
}

#[test]
fn falls_back_to_the_dot_loam_directory() {
    let _lock = env_lock();
    let _env = EnvVarGuard::remove(LOAM_CONFIG_ENV_VAR);

    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join(".loam")).unwrap();
    let config_path = dir.path().join(".loam/config.toml");
    std::fs::write(&config_path, "").unwrap();

    let discovered = discover_config_path(dir.path()).expect("fallback is discovered");
    assert_eq!(discovered, config_path.canonicalize().unwrap_or(config_path));
}

#[test]
fn env_override_wins_over_workspace_file() {
    let _lock = env_lock();

    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("loam.toml"), "[logging]\nlevel = \"info\"\n").unwrap();
    let override_path = dir.path().join("override.toml");
    std::fs::write(&override_path, "[logging]\nlevel = \"trace\"\n").unwrap();
    let _env = EnvVarGuard::set(LOAM_CONFIG_ENV_VAR, "override.toml");

    let (config, path) = load_for_workspace(dir.path()).expect("config loads");
    assert_eq!(
        path,
        Some(override_path.canonicalize().unwrap_or(override_path))
    );
    assert_eq!(config.logging.level, "trace");
}

#[test]
fn missing_config_yields_defaults() {
    let _lock = env_lock();
    let _env = EnvVarGuard::remove(LOAM_CONFIG_ENV_VAR);

    let dir = tempdir().unwrap();
    let (config, path) = load_for_workspace(dir.path()).expect("defaults");
    assert_eq!(path, None);
    assert_eq!(config, LoamConfig::default());
}

#[test]
fn classpath_entries_resolve_against_the_config_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("loam.toml");
    std::fs::write(
        &path,
        r#"
[classpath]
archives = ["libs/groovy.jar"]
class_dirs = ["build/classes"]
source_roots = ["src/main/groovy"]

[resolution]
trusted_platform_only = true
static_compilation = true
"#,
    )
    .unwrap();

    let config = LoamConfig::load_from_path(&path).expect("config loads");
    assert_eq!(config.classpath.archives, vec![dir.path().join("libs/groovy.jar")]);
    assert_eq!(config.classpath.class_dirs, vec![dir.path().join("build/classes")]);
    assert_eq!(
        config.classpath.source_roots,
        vec![dir.path().join("src/main/groovy")]
    );
    assert_eq!(config.classpath.jdk_home, None::<PathBuf>);
    assert!(config.resolution.trusted_platform_only);
    assert!(config.resolution.sources_first);
    assert!(config.resolution.static_compilation);
}

#[test]
fn unknown_keys_and_bad_toml_are_errors() {
    let err = LoamConfig::load_from_str("[classpath]\njars = []\n").expect_err("unknown key");
    assert!(matches!(err, ConfigError::Toml(_)));

    let err = LoamConfig::load_from_str("[logging\n").expect_err("bad toml");
    assert!(err.to_string().starts_with("failed to parse toml config"));

    let dir = tempdir().unwrap();
    let err = LoamConfig::load_from_path(dir.path().join("absent.toml")).expect_err("io");
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn init_tracing_is_idempotent() {
    let config = LoamConfig::default();
    loam_config::init_tracing(&config.logging);
    loam_config::init_tracing(&config.logging);
    tracing::info!(target: "loam.config", "still logging");
}
