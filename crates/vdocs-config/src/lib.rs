//! Configuration management for vdocs.
//!
//! Parses `vdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Build Mode
//!
//! The development flag is resolved once, in this order:
//! 1. CLI override (`--dev` / `--production`)
//! 2. `build.mode` in `vdocs.toml`
//! 3. `VDOCS_ENV=development` in the environment
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `content.root`
//! - `content.sources`
//! - `versions.catalog`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override project root directory.
    pub project_root: Option<PathBuf>,
    /// Override version catalog file.
    pub catalog: Option<PathBuf>,
    /// Override development mode.
    pub development: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "vdocs.toml";

/// Environment variable carrying the build environment.
pub const ENV_VAR: &str = "VDOCS_ENV";

/// Default maximum number of documentation nodes returned by the content query.
pub const DEFAULT_QUERY_LIMIT: usize = 1000;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Version catalog configuration.
    versions: VersionsConfigRaw,
    /// Build configuration.
    build: BuildConfigRaw,
    /// Public URL layout.
    pub site: SiteConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved version catalog location (set after loading).
    #[serde(skip)]
    pub versions_resolved: VersionsConfig,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root: Option<String>,
    sources: Option<Vec<String>>,
    dir: Option<String>,
    slug_base: Option<String>,
    template_prefix: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug)]
pub struct ContentConfig {
    /// Project root; content node paths are taken relative to it.
    pub project_root: PathBuf,
    /// Directories scanned for markdown files.
    pub sources: Vec<PathBuf>,
    /// First path segment (relative to the project root) of versioned docs.
    pub content_dir: String,
    /// Base path used by the file-path slug resolver.
    pub slug_base: String,
    /// Filename prefix marking documentation templates.
    pub template_prefix: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

impl ContentConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            project_root: base.to_path_buf(),
            sources: vec![base.join("data")],
            content_dir: "data".to_owned(),
            slug_base: "pages".to_owned(),
            template_prefix: "_".to_owned(),
        }
    }

    /// Absolute path of the versioned content directory.
    #[must_use]
    pub fn content_path(&self) -> PathBuf {
        self.project_root.join(&self.content_dir)
    }
}

/// Raw version catalog configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct VersionsConfigRaw {
    catalog: Option<String>,
}

/// Resolved version catalog location.
#[derive(Debug, Default)]
pub struct VersionsConfig {
    /// JSON file mapping version labels to identifiers.
    pub catalog: PathBuf,
}

/// Raw build configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    mode: Option<String>,
    query_limit: Option<usize>,
}

/// Resolved build configuration.
#[derive(Debug)]
pub struct BuildConfig {
    /// Whether this is a development build (exposes the `next` version).
    pub development: bool,
    /// Maximum number of documentation nodes fetched by the content query.
    pub query_limit: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            development: false,
            query_limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

/// Public URL layout.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// First URL segment of every documentation page (e.g. `docs`).
    pub docs_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            docs_prefix: "docs".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`versions.catalog`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a string field to be a single path segment.
fn require_segment(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains('/') || value.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "{field} must be a single path segment, got {value:?}"
        )));
    }
    Ok(())
}

/// Parse a `build.mode` value into a development flag.
fn parse_mode(mode: &str) -> Result<bool, ConfigError> {
    match mode {
        "development" => Ok(true),
        "production" => Ok(false),
        other => Err(ConfigError::Validation(format!(
            "build.mode must be \"development\" or \"production\", got {other:?}"
        ))),
    }
}

/// Read the development flag from [`ENV_VAR`].
#[must_use]
pub fn development_from_env() -> bool {
    std::env::var(ENV_VAR).is_ok_and(|value| value == "development")
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `vdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root) = &settings.project_root {
            let sources = self
                .content_resolved
                .sources
                .iter()
                .map(|source| {
                    source
                        .strip_prefix(&self.content_resolved.project_root)
                        .map_or_else(|_| source.clone(), |rel| root.join(rel))
                })
                .collect();
            self.content_resolved.sources = sources;
            self.content_resolved.project_root.clone_from(root);
        }
        if let Some(catalog) = &settings.catalog {
            self.versions_resolved.catalog.clone_from(catalog);
        }
        if let Some(development) = settings.development {
            self.build_resolved.development = development;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        let mut config = Self::default_with_base(&cwd);
        config.build_resolved.development = development_from_env();
        config
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            versions: VersionsConfigRaw::default(),
            build: BuildConfigRaw::default(),
            site: SiteConfig::default(),
            content_resolved: ContentConfig::with_base(base),
            versions_resolved: VersionsConfig {
                catalog: base.join("content/versions.json"),
            },
            build_resolved: BuildConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir, development_from_env())?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let content = &self.content_resolved;
        require_segment(&content.content_dir, "content.dir")?;
        require_non_empty(&content.template_prefix, "content.template_prefix")?;
        require_segment(&self.site.docs_prefix, "site.docs_prefix")?;
        if content.sources.is_empty() {
            return Err(ConfigError::Validation(
                "content.sources must list at least one directory".to_owned(),
            ));
        }
        if self.build_resolved.query_limit == 0 {
            return Err(ConfigError::Validation(
                "build.query_limit must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_opt(&mut self.content.root, "content.root")?;
        expand::expand_opt(&mut self.versions.catalog, "versions.catalog")?;
        if let Some(sources) = &mut self.content.sources {
            for source in sources.iter_mut() {
                *source = expand::expand_env(source, "content.sources")?;
            }
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory and settle the build mode.
    fn resolve(&mut self, config_dir: &Path, env_development: bool) -> Result<(), ConfigError> {
        let project_root = match self.content.root.as_deref() {
            Some(root) => config_dir.join(root),
            None => config_dir.to_path_buf(),
        };
        let content_dir = self
            .content
            .dir
            .clone()
            .unwrap_or_else(|| "data".to_owned());
        let sources = match &self.content.sources {
            Some(sources) => sources.iter().map(|s| project_root.join(s)).collect(),
            None => vec![project_root.join(&content_dir)],
        };

        self.content_resolved = ContentConfig {
            sources,
            content_dir,
            slug_base: self
                .content
                .slug_base
                .clone()
                .unwrap_or_else(|| "pages".to_owned()),
            template_prefix: self
                .content
                .template_prefix
                .clone()
                .unwrap_or_else(|| "_".to_owned()),
            project_root,
        };

        self.versions_resolved = VersionsConfig {
            catalog: config_dir.join(
                self.versions
                    .catalog
                    .as_deref()
                    .unwrap_or("content/versions.json"),
            ),
        };

        let development = match self.build.mode.as_deref() {
            Some(mode) => parse_mode(mode)?,
            None => env_development,
        };
        self.build_resolved = BuildConfig {
            development,
            query_limit: self.build.query_limit.unwrap_or(DEFAULT_QUERY_LIMIT),
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        let content = &config.content_resolved;
        assert_eq!(content.project_root, PathBuf::from("/test"));
        assert_eq!(content.sources, vec![PathBuf::from("/test/data")]);
        assert_eq!(content.content_dir, "data");
        assert_eq!(content.content_path(), PathBuf::from("/test/data"));
        assert_eq!(content.slug_base, "pages");
        assert_eq!(content.template_prefix, "_");
        assert_eq!(
            config.versions_resolved.catalog,
            PathBuf::from("/test/content/versions.json")
        );
        assert_eq!(config.site.docs_prefix, "docs");
        assert!(!config.build_resolved.development);
        assert_eq!(config.build_resolved.query_limit, 1000);
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve(Path::new("/project"), false).unwrap();
        assert_eq!(
            config.content_resolved.sources,
            vec![PathBuf::from("/project/data")]
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[content]
root = "site"
sources = ["data", "content/blog"]
dir = "data"
slug_base = "pages"

[versions]
catalog = "content/versions.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project"), false).unwrap();

        assert_eq!(
            config.content_resolved.project_root,
            PathBuf::from("/project/site")
        );
        assert_eq!(
            config.content_resolved.sources,
            vec![
                PathBuf::from("/project/site/data"),
                PathBuf::from("/project/site/content/blog"),
            ]
        );
        assert_eq!(
            config.versions_resolved.catalog,
            PathBuf::from("/project/content/versions.json")
        );
    }

    #[test]
    fn test_mode_from_config_wins_over_env() {
        let toml = r#"
[build]
mode = "production"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project"), true).unwrap();
        assert!(!config.build_resolved.development);
    }

    #[test]
    fn test_mode_falls_back_to_env() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve(Path::new("/project"), true).unwrap();
        assert!(config.build_resolved.development);
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let toml = r#"
[build]
mode = "staging"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve(Path::new("/project"), false).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn test_apply_cli_settings_development() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            development: Some(true),
            ..Default::default()
        });
        assert!(config.build_resolved.development);
    }

    #[test]
    fn test_apply_cli_settings_project_root_moves_sources() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            project_root: Some(PathBuf::from("/other")),
            ..Default::default()
        });
        assert_eq!(config.content_resolved.project_root, PathBuf::from("/other"));
        assert_eq!(
            config.content_resolved.sources,
            vec![PathBuf::from("/other/data")]
        );
    }

    #[test]
    fn test_apply_cli_settings_catalog() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            catalog: Some(PathBuf::from("/etc/versions.json")),
            ..Default::default()
        });
        assert_eq!(
            config.versions_resolved.catalog,
            PathBuf::from("/etc/versions.json")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(
            config.content_resolved.project_root,
            before.content_resolved.project_root
        );
        assert_eq!(
            config.build_resolved.development,
            before.build_resolved.development
        );
    }

    #[test]
    fn test_expand_env_vars_catalog() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("VDOCS_TEST_CATALOG", "/shared/versions.json");
        }
        let toml = r#"
[versions]
catalog = "${VDOCS_TEST_CATALOG}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve(Path::new("/project"), false).unwrap();
        assert_eq!(
            config.versions_resolved.catalog,
            PathBuf::from("/shared/versions.json")
        );
        unsafe {
            std::env::remove_var("VDOCS_TEST_CATALOG");
        }
    }

    fn assert_validation_error(config: &Config, expected: &str) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(
            err.to_string().contains(expected),
            "Expected {expected:?} in {err}"
        );
    }

    #[test]
    fn test_validate_default_config_passes() {
        Config::default_with_base(Path::new("/test"))
            .validate()
            .unwrap();
    }

    #[test]
    fn test_validate_nested_content_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.content_dir = "data/docs".to_owned();
        assert_validation_error(&config, "content.dir");
    }

    #[test]
    fn test_validate_empty_docs_prefix() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.docs_prefix = String::new();
        assert_validation_error(&config, "site.docs_prefix");
    }

    #[test]
    fn test_validate_query_limit_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.build_resolved.query_limit = 0;
        assert_validation_error(&config, "build.query_limit");
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/vdocs.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_sets_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vdocs.toml");
        std::fs::write(&path, "[site]\ndocs_prefix = \"reference\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.site.docs_prefix, "reference");
        assert_eq!(config.content_resolved.content_dir, "data");
    }
}
