//! Configuration for curriculum.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CURRICULUM_HOME, CURRICULUM_REMOTE_URL)
//! 2. Config file (.curriculum/config.yaml)
//! 3. Defaults (~/.curriculum, ./lessons, ./modules, ./public)
//!
//! Config file discovery:
//! - Searches current directory and parents for .curriculum/config.yaml
//! - `paths.home` is relative to the .curriculum/ directory, every other
//!   path is relative to the project root (the parent of .curriculum/)
//!
//! The resolved value is built once by the caller and passed down; nothing
//! here is cached process-wide.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::parser::lesson::DEFAULT_LESSON_EXTENSION;
use crate::parser::module::DEFAULT_MODULE_EXTENSION;
use crate::repository::fetcher::DEFAULT_TIMEOUT_SECS;

const CONFIG_DIR: &str = ".curriculum";
const CONFIG_FILE: &str = "config.yaml";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub parser: Option<ParserConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Client state directory (relative to .curriculum/)
    pub home: Option<String>,
    /// Lesson documents directory
    pub lessons: Option<String>,
    /// Module documents directory
    pub modules: Option<String>,
    /// Publish output root
    pub output: Option<String>,
    /// Local content cache (defaults to <home>/cache)
    pub cache: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub lesson_extension: Option<String>,
    pub module_extension: Option<String>,
}

/// Values taken from the environment
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub home: Option<String>,
    pub remote_url: Option<String>,
}

impl EnvOverrides {
    /// Read CURRICULUM_HOME and CURRICULUM_REMOTE_URL
    pub fn from_env() -> Self {
        Self {
            home: std::env::var("CURRICULUM_HOME").ok(),
            remote_url: std::env::var("CURRICULUM_REMOTE_URL").ok(),
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Client state directory
    pub home: PathBuf,
    pub lessons_dir: PathBuf,
    pub modules_dir: PathBuf,
    pub output_dir: PathBuf,
    pub cache_dir: PathBuf,
    /// Remote corpus settings
    pub remote: RemoteSettings,
    /// Document extensions
    pub parser: ParserSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// Base URL the corpus is served from
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParserSettings {
    pub lesson_extension: String,
    pub module_extension: String,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            lesson_extension: DEFAULT_LESSON_EXTENSION.to_string(),
            module_extension: DEFAULT_MODULE_EXTENSION.to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Load configuration for the current directory and environment
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        let default_home = dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(CONFIG_DIR);

        resolve(&cwd, find_config_file(&cwd), default_home, EnvOverrides::from_env())
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Combine config file, environment and defaults
fn resolve(
    cwd: &Path,
    config_file: Option<PathBuf>,
    default_home: PathBuf,
    env: EnvOverrides,
) -> Result<ResolvedConfig> {
    let config = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    // .curriculum/ and the project root that contains it
    let (config_dir, base_dir) = match config_file.as_deref().and_then(Path::parent) {
        Some(dir) => (dir, dir.parent().unwrap_or(dir)),
        None => (cwd, cwd),
    };

    let paths = config.as_ref().map(|c| c.paths.clone()).unwrap_or_default();

    let home = if let Some(env_home) = env.home {
        PathBuf::from(env_home)
    } else if let Some(ref home_path) = paths.home {
        resolve_path(config_dir, home_path)
    } else {
        default_home
    };

    let dir_or = |value: &Option<String>, default: &str| {
        resolve_path(base_dir, value.as_deref().unwrap_or(default))
    };

    let lessons_dir = dir_or(&paths.lessons, "lessons");
    let modules_dir = dir_or(&paths.modules, "modules");
    let output_dir = dir_or(&paths.output, "public");
    let cache_dir = match paths.cache {
        Some(ref cache) => resolve_path(base_dir, cache),
        None => home.join("cache"),
    };

    let remote_config = config.as_ref().and_then(|c| c.remote.clone());
    let remote = RemoteSettings {
        base_url: env
            .remote_url
            .or_else(|| remote_config.as_ref().and_then(|r| r.base_url.clone())),
        timeout_seconds: remote_config
            .as_ref()
            .and_then(|r| r.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    };

    let parser_config = config.as_ref().and_then(|c| c.parser.clone());
    let defaults = ParserSettings::default();
    let parser = ParserSettings {
        lesson_extension: parser_config
            .as_ref()
            .and_then(|p| p.lesson_extension.clone())
            .unwrap_or(defaults.lesson_extension),
        module_extension: parser_config
            .as_ref()
            .and_then(|p| p.module_extension.clone())
            .unwrap_or(defaults.module_extension),
    };

    Ok(ResolvedConfig {
        lessons_dir,
        modules_dir,
        output_dir,
        cache_dir,
        home,
        remote,
        parser,
        config_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(root: &Path, yaml: &str) -> PathBuf {
        let config_dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", yaml).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let cwd = PathBuf::from("/work/course");
        let config = resolve(
            &cwd,
            None,
            PathBuf::from("/home/me/.curriculum"),
            EnvOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.home, PathBuf::from("/home/me/.curriculum"));
        assert_eq!(config.cache_dir, PathBuf::from("/home/me/.curriculum/cache"));
        assert_eq!(config.lessons_dir, cwd.join("lessons"));
        assert_eq!(config.modules_dir, cwd.join("modules"));
        assert_eq!(config.output_dir, cwd.join("public"));
        assert_eq!(config.parser.lesson_extension, "lesson");
        assert_eq!(config.parser.module_extension, "yaml");
        assert!(config.remote.base_url.is_none());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
paths:
  home: ./state
  lessons: content/lessons
  output: /srv/www
remote:
  base_url: https://cdn.example.com/corpus
  timeout_seconds: 5
parser:
  lesson_extension: txt
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("./state".to_string()));
        assert_eq!(config.remote.unwrap().timeout_seconds, Some(5));
        assert_eq!(config.parser.unwrap().module_extension, None);
    }

    #[test]
    fn test_paths_resolve_against_project_root() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
paths:
  home: state
  lessons: content/lessons
  output: /srv/www
parser:
  lesson_extension: txt
"#,
        );

        let nested = temp.path().join("content").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, config_path);

        let config = resolve(
            &nested,
            Some(found),
            PathBuf::from("/unused"),
            EnvOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.home, temp.path().join(CONFIG_DIR).join("state"));
        assert_eq!(config.cache_dir, config.home.join("cache"));
        assert_eq!(config.lessons_dir, temp.path().join("content/lessons"));
        assert_eq!(config.modules_dir, temp.path().join("modules"));
        assert_eq!(config.output_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.parser.lesson_extension, "txt");
        assert_eq!(config.parser.module_extension, "yaml");
    }

    #[test]
    fn test_env_overrides_win() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
remote:
  base_url: https://from-file.example.com
"#,
        );

        let env = EnvOverrides {
            home: Some("/env/home".to_string()),
            remote_url: Some("https://from-env.example.com".to_string()),
        };
        let config = resolve(temp.path(), Some(config_path), PathBuf::from("/unused"), env).unwrap();

        assert_eq!(config.home, PathBuf::from("/env/home"));
        assert_eq!(
            config.remote.base_url.as_deref(),
            Some("https://from-env.example.com")
        );
        assert_eq!(config.remote.timeout_seconds, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/./subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
