//! Configuration file support for gangway.
//!
//! Gangway supports two configuration file locations:
//! - Global: `~/.gangway/config.toml` - User-wide defaults
//! - Project: `.gangway/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config; environment
//! variables take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Gangway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Toolkit discovery settings
    pub llvm: LlvmSettings,
}

/// Settings steering toolkit discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlvmSettings {
    /// Version to look for (e.g., "3.5" or "3.4.2")
    pub version: Option<String>,

    /// Installation prefix whose bin/ is consulted first (e.g., /opt/llvm)
    pub prefix: Option<PathBuf>,

    /// Explicit path to the query tool (e.g., /usr/bin/llvm-config-3.5)
    pub config_tool: Option<PathBuf>,
}

impl ToolkitConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: ToolkitConfig) {
        if other.llvm.version.is_some() {
            self.llvm.version = other.llvm.version;
        }
        if other.llvm.prefix.is_some() {
            self.llvm.prefix = other.llvm.prefix;
        }
        if other.llvm.config_tool.is_some() {
            self.llvm.config_tool = other.llvm.config_tool;
        }
    }

    /// Check if any discovery settings are configured.
    pub fn has_overrides(&self) -> bool {
        self.llvm.version.is_some()
            || self.llvm.prefix.is_some()
            || self.llvm.config_tool.is_some()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.gangway/config.toml)
/// 2. Global config (~/.gangway/config.toml)
/// 3. Defaults
pub fn load_merged_config(global_path: &Path, project_path: &Path) -> ToolkitConfig {
    let mut config = ToolkitConfig::default();

    // Load global config first
    if global_path.exists() {
        let global = ToolkitConfig::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = ToolkitConfig::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global gangway config directory (~/.gangway).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".gangway"))
}

/// Get the global config path (~/.gangway/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.gangway/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".gangway").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = ToolkitConfig::default();
        assert!(config.llvm.version.is_none());
        assert!(config.llvm.prefix.is_none());
        assert!(config.llvm.config_tool.is_none());
        assert!(!config.has_overrides());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[llvm]
version = "3.5"
prefix = "/opt/llvm"
config_tool = "/opt/llvm/bin/llvm-config"
"#,
        )
        .unwrap();

        let config = ToolkitConfig::load(&config_path).unwrap();
        assert_eq!(config.llvm.version, Some("3.5".to_string()));
        assert_eq!(config.llvm.prefix, Some(PathBuf::from("/opt/llvm")));
        assert_eq!(
            config.llvm.config_tool,
            Some(PathBuf::from("/opt/llvm/bin/llvm-config"))
        );
        assert!(config.has_overrides());
    }

    #[test]
    fn test_config_load_rejects_bad_toml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[llvm\nversion = ").unwrap();

        assert!(ToolkitConfig::load(&config_path).is_err());
    }

    #[test]
    fn test_config_merge() {
        let mut base = ToolkitConfig::default();
        base.llvm.version = Some("3.4".to_string());
        base.llvm.prefix = Some(PathBuf::from("/usr"));

        let mut override_cfg = ToolkitConfig::default();
        override_cfg.llvm.version = Some("3.5".to_string());

        base.merge(override_cfg);

        assert_eq!(base.llvm.version, Some("3.5".to_string()));
        assert_eq!(base.llvm.prefix, Some(PathBuf::from("/usr"))); // Not overridden
    }

    #[test]
    fn test_load_merged_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[llvm]
version = "3.4"
prefix = "/usr"
"#,
        )
        .unwrap();

        // Project config overrides version but not prefix
        std::fs::write(
            &project_path,
            r#"
[llvm]
version = "3.5"
"#,
        )
        .unwrap();

        let config = load_merged_config(&global_path, &project_path);

        assert_eq!(config.llvm.version, Some("3.5".to_string()));
        assert_eq!(config.llvm.prefix, Some(PathBuf::from("/usr")));
    }

    #[test]
    fn test_project_config_path_layout() {
        let path = project_config_path(Path::new("/work/demo"));
        assert_eq!(path, PathBuf::from("/work/demo/.gangway/config.toml"));
    }
}
