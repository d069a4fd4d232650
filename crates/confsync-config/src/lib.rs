//! Configuration management for confsync.
//!
//! Parses `confsync.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support `${VAR}` environment variable
//! expansion. Expanded fields:
//!
//! - `confluence.base_url`
//! - `confluence.username`
//! - `confluence.api_token`
//! - `diagrams.kroki_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override Confluence space ID.
    pub space_id: Option<String>,
    /// Override Kroki URL for diagram rendering.
    pub kroki_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "confsync.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    #[serde(default)]
    docs: DocsConfigRaw,
    /// Diagram rendering configuration (optional section).
    /// When present, `kroki_url` is required.
    diagrams: Option<DiagramsConfigRaw>,
    /// Confluence configuration.
    pub confluence: Option<ConfluenceConfig>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved diagrams configuration (set after loading).
    #[serde(skip)]
    pub diagrams_resolved: DiagramsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
}

/// Raw diagrams configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DiagramsConfigRaw {
    kroki_url: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

/// Resolved diagram rendering configuration.
#[derive(Debug, Default)]
pub struct DiagramsConfig {
    /// Kroki server URL for diagram rendering (None disables rendering).
    pub kroki_url: Option<String>,
    /// Diagram language endpoint on the render server.
    pub endpoint: Option<String>,
    /// Render request timeout in seconds.
    pub timeout_secs: u64,
}

/// Confluence configuration.
#[derive(Debug, Deserialize)]
pub struct ConfluenceConfig {
    /// Confluence site base URL.
    pub base_url: String,
    /// Account email for basic authentication.
    pub username: String,
    /// API token for basic authentication.
    pub api_token: String,
    /// Space to create pages in.
    pub space_id: String,
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.username, "confluence.username")?;
        require_non_empty(&self.api_token, "confluence.api_token")?;
        require_non_empty(&self.space_id, "confluence.space_id")?;
        Ok(())
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
        /// Config field path (e.g., "`confluence.api_token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_TOKEN`} not set").
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

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `confsync.toml` in current directory and parents.
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

    /// Get validated Confluence configuration.
    ///
    /// Returns the Confluence config if the `[confluence]` section is present
    /// and all fields are valid. Use this instead of accessing the `confluence`
    /// field directly when the command requires Confluence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        let conf = self.confluence.as_ref().ok_or_else(|| {
            ConfigError::Validation("[confluence] section required in config".into())
        })?;
        conf.validate()?;
        Ok(conf)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(space_id) = &settings.space_id
            && let Some(confluence) = &mut self.confluence
        {
            confluence.space_id.clone_from(space_id);
        }
        if let Some(kroki_url) = &settings.kroki_url {
            self.diagrams_resolved.kroki_url = Some(kroki_url.clone());
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
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            diagrams: None,
            confluence: None,
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
            },
            diagrams_resolved: DiagramsConfig {
                kroki_url: None,
                endpoint: None,
                timeout_secs: 30,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref kroki_url) = self.diagrams_resolved.kroki_url {
            require_non_empty(kroki_url, "diagrams.kroki_url")?;
            require_http_url(kroki_url, "diagrams.kroki_url")?;
        }

        if self.diagrams_resolved.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "diagrams.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        if let Some(ref confluence) = self.confluence {
            confluence.validate()?;
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut diagrams) = self.diagrams
            && let Some(ref url) = diagrams.kroki_url
        {
            diagrams.kroki_url = Some(expand::expand_env(url, "diagrams.kroki_url")?);
        }

        if let Some(ref mut confluence) = self.confluence {
            confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
            confluence.username = expand::expand_env(&confluence.username, "confluence.username")?;
            confluence.api_token =
                expand::expand_env(&confluence.api_token, "confluence.api_token")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// Validates that `kroki_url` is provided when `[diagrams]` section exists.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
        };

        self.diagrams_resolved = match &self.diagrams {
            Some(diagrams) => {
                let kroki_url = diagrams.kroki_url.clone().ok_or_else(|| {
                    ConfigError::Validation(
                        "diagrams.kroki_url required when [diagrams] section present".to_owned(),
                    )
                })?;
                DiagramsConfig {
                    kroki_url: Some(kroki_url),
                    endpoint: diagrams.endpoint.clone(),
                    timeout_secs: diagrams.timeout_secs.unwrap_or(30),
                }
            }
            None => DiagramsConfig {
                kroki_url: None,
                endpoint: None,
                timeout_secs: 30,
            },
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert!(config.confluence.is_none());
        assert!(config.diagrams_resolved.kroki_url.is_none());
        assert_eq!(config.diagrams_resolved.timeout_secs, 30);
    }

    #[test]
    fn parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.confluence.is_none());
    }

    #[test]
    fn parse_confluence_config() {
        let toml = r#"
[confluence]
base_url = "https://example.atlassian.net"
username = "docs@example.com"
api_token = "token123"
space_id = "777"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let confluence = config.confluence.unwrap();
        assert_eq!(confluence.base_url, "https://example.atlassian.net");
        assert_eq!(confluence.username, "docs@example.com");
        assert_eq!(confluence.api_token, "token123");
        assert_eq!(confluence.space_id, "777");
    }

    #[test]
    fn resolve_paths_joins_config_dir() {
        let toml = r#"
[docs]
source_dir = "documentation"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/documentation")
        );
    }

    #[test]
    fn diagrams_section_requires_kroki_url() {
        let toml = r#"
[diagrams]
timeout_secs = 10
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let result = config.resolve_paths(Path::new("/project"));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn diagrams_section_resolves() {
        let toml = r#"
[diagrams]
kroki_url = "https://kroki.example.com"
endpoint = "mermaid"
timeout_secs = 10
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert_eq!(
            config.diagrams_resolved.kroki_url.as_deref(),
            Some("https://kroki.example.com")
        );
        assert_eq!(config.diagrams_resolved.endpoint.as_deref(), Some("mermaid"));
        assert_eq!(config.diagrams_resolved.timeout_secs, 10);
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let confluence = ConfluenceConfig {
            base_url: "example.atlassian.net".to_owned(),
            username: "docs@example.com".to_owned(),
            api_token: "token".to_owned(),
            space_id: "777".to_owned(),
        };
        assert!(matches!(
            confluence.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_token() {
        let confluence = ConfluenceConfig {
            base_url: "https://example.atlassian.net".to_owned(),
            username: "docs@example.com".to_owned(),
            api_token: String::new(),
            space_id: "777".to_owned(),
        };
        assert!(confluence.validate().is_err());
    }

    #[test]
    fn require_confluence_on_missing_section() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(matches!(
            config.require_confluence(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn apply_cli_settings_overrides() {
        let toml = r#"
[confluence]
base_url = "https://example.atlassian.net"
username = "docs@example.com"
api_token = "token123"
space_id = "777"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        config.apply_cli_settings(&CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            space_id: Some("999".to_owned()),
            kroki_url: Some("https://kroki.io".to_owned()),
        });

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        assert_eq!(config.confluence.unwrap().space_id, "999");
        assert_eq!(
            config.diagrams_resolved.kroki_url.as_deref(),
            Some("https://kroki.io")
        );
    }

    #[test]
    fn expand_env_vars_confluence_token() {
        unsafe {
            std::env::set_var("CONFSYNC_TEST_TOKEN", "expanded-token");
        }

        let toml = r#"
[confluence]
base_url = "https://example.atlassian.net"
username = "docs@example.com"
api_token = "${CONFSYNC_TEST_TOKEN}"
space_id = "777"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.confluence.unwrap().api_token, "expanded-token");

        unsafe {
            std::env::remove_var("CONFSYNC_TEST_TOKEN");
        }
    }

    #[test]
    fn expand_env_vars_missing_required_var() {
        let toml = r#"
[confluence]
base_url = "https://example.atlassian.net"
username = "docs@example.com"
api_token = "${CONFSYNC_TEST_UNSET_VAR}"
space_id = "777"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let result = config.expand_env_vars();
        assert!(matches!(result, Err(ConfigError::EnvVar { .. })));
    }

    #[test]
    fn load_explicit_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn load_from_file_resolves_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confsync.toml");
        std::fs::write(
            &path,
            r#"
[docs]
source_dir = "pages"

[confluence]
base_url = "https://example.atlassian.net"
username = "docs@example.com"
api_token = "token123"
space_id = "777"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.docs_resolved.source_dir, dir.path().join("pages"));
        assert_eq!(config.config_path, Some(path));
        assert!(config.require_confluence().is_ok());
    }
}
