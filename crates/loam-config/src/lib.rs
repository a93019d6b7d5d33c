//! Workspace configuration (`loam.toml`) and the tracing bootstrap.

use std::path::{Path, PathBuf};
use std::sync::Once;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

/// Environment variable naming an explicit config file.
pub const LOAM_CONFIG_ENV_VAR: &str = "LOAM_CONFIG_PATH";

/// Loam workspace configuration.
///
/// ```toml
/// [classpath]
/// archives = ["libs/groovy-4.0.jar"]
/// class_dirs = ["build/classes"]
/// source_roots = ["src/main/groovy"]
/// jdk_home = "/usr/lib/jvm/java-17"
///
/// [resolution]
/// trusted_platform_only = false
/// sources_first = true
/// static_compilation = false
///
/// [logging]
/// level = "info"
/// json = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoamConfig {
    #[serde(default)]
    pub classpath: ClasspathConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where compiled and source types come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClasspathConfig {
    /// `.jar` and `.jmod` files, searched in order.
    #[serde(default)]
    pub archives: Vec<PathBuf>,

    /// Directories of `.class` files laid out by package.
    #[serde(default)]
    pub class_dirs: Vec<PathBuf>,

    /// Directories of `.groovy`/`.java` sources laid out by package.
    #[serde(default)]
    pub source_roots: Vec<PathBuf>,

    /// A JDK whose `jmods/*.jmod` are appended after `archives`.
    #[serde(default)]
    pub jdk_home: Option<PathBuf>,
}

impl ClasspathConfig {
    /// Makes relative entries relative to `base` (normally the config file's directory).
    pub fn resolve_paths(&mut self, base: &Path) {
        let absolutize = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        self.archives.iter_mut().for_each(absolutize);
        self.class_dirs.iter_mut().for_each(absolutize);
        self.source_roots.iter_mut().for_each(absolutize);
        if let Some(jdk_home) = self.jdk_home.as_mut() {
            absolutize(jdk_home);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
            && self.class_dirs.is_empty()
            && self.source_roots.is_empty()
            && self.jdk_home.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolutionConfig {
    /// Restrict the platform solver to `java.*`, `javax.*` and `groovy.*` names.
    #[serde(default)]
    pub trusted_platform_only: bool,

    /// Register source solvers ahead of compiled classes, so edited sources shadow stale
    /// class files.
    #[serde(default = "ResolutionConfig::default_sources_first")]
    pub sources_first: bool,

    /// Infer types with `@CompileStatic` semantics by default.
    #[serde(default)]
    pub static_compilation: bool,
}

impl ResolutionConfig {
    fn default_sources_first() -> bool {
        true
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            trusted_platform_only: false,
            sources_first: Self::default_sources_first(),
            static_compilation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            "off" | "none" => "off".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured level with `RUST_LOG` merged on top.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` quotes a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl LoamConfig {
    /// Loads a TOML config file. Relative classpath entries resolve against the file's
    /// directory.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::load_from_str(&text)?;
        if let Some(dir) = path.parent() {
            config.classpath.resolve_paths(dir);
        }
        tracing::debug!(
            target: "loam.config",
            path = %path.display(),
            archives = config.classpath.archives.len(),
            class_dirs = config.classpath.class_dirs.len(),
            source_roots = config.classpath.source_roots.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Parses TOML text. Paths are kept as written.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Finds the config file for a workspace root.
///
/// Search order:
/// 1) `LOAM_CONFIG_PATH` (absolute or relative to `workspace_root`)
/// 2) `loam.toml` in `workspace_root`
/// 3) `.loam/config.toml` in `workspace_root`
pub fn discover_config_path(workspace_root: &Path) -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(LOAM_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            workspace_root.join(candidate)
        };
        return Some(path.canonicalize().unwrap_or(path));
    }

    ["loam.toml", ".loam/config.toml"]
        .into_iter()
        .map(|name| workspace_root.join(name))
        .find(|path| path.is_file())
        .map(|path| path.canonicalize().unwrap_or(path))
}

/// Loads the config for a workspace root; without a config file this is the default config
/// and `None`.
pub fn load_for_workspace(
    workspace_root: &Path,
) -> Result<(LoamConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(workspace_root) else {
        return Ok((LoamConfig::default(), None));
    };
    let config = LoamConfig::load_from_path(&path)?;
    Ok((config, Some(path)))
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let layer: Box<dyn Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!(target: "loam.config", level = %config.level, "tracing initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn level_directives_are_forgiving() {
        assert_eq!(LoggingConfig::normalize_level_directives(" WARNING "), "warn");
        assert_eq!(LoggingConfig::normalize_level_directives(""), "info");
        assert_eq!(
            LoggingConfig::normalize_level_directives("loam.resolve=debug"),
            "loam.resolve=debug"
        );
    }

    #[test]
    fn relative_paths_resolve_against_the_base() {
        let mut classpath = ClasspathConfig {
            archives: vec![PathBuf::from("libs/a.jar"), PathBuf::from("/opt/b.jar")],
            class_dirs: vec![PathBuf::from("build/classes")],
            source_roots: Vec::new(),
            jdk_home: Some(PathBuf::from("jdk")),
        };
        classpath.resolve_paths(Path::new("/work"));

        assert_eq!(
            classpath.archives,
            vec![PathBuf::from("/work/libs/a.jar"), PathBuf::from("/opt/b.jar")]
        );
        assert_eq!(classpath.class_dirs, vec![PathBuf::from("/work/build/classes")]);
        assert_eq!(classpath.jdk_home, Some(PathBuf::from("/work/jdk")));
    }

    #[test]
    fn defaults_put_sources_first() {
        let config = LoamConfig::load_from_str("").expect("empty config");
        assert!(config.resolution.sources_first);
        assert!(!config.resolution.static_compilation);
        assert!(config.classpath.is_empty());
        assert_eq!(config.logging.level, "info");
    }
}
