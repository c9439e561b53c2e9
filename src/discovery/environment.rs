//! Inputs that steer discovery.
//!
//! Everything outside the process (environment variables and config
//! files) is captured into one immutable value up front. The engine only
//! ever reads this value, which keeps discovery reproducible and lets
//! tests inject whatever surroundings they need.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::util::config::{self, ToolkitConfig};
use crate::util::search;

/// Names the toolkit version to use, as `X.Y` or `X.Y.Z`.
pub const VERSION_ENV: &str = "GANGWAY_LLVM_VERSION";

/// Directories to search for tools instead of `PATH`, separated the way
/// `PATH` is on this platform.
pub const TOOL_PATH_ENV: &str = "GANGWAY_TOOL_PATH";

/// A snapshot of the discovery-relevant surroundings.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Requested version, still unparsed.
    pub version_override: Option<String>,
    /// Tool search directories overriding `PATH`.
    pub search_path: Option<OsString>,
    /// Explicit query-tool path.
    pub config_tool: Option<PathBuf>,
    /// Installation prefix whose `bin/` is consulted before the search
    /// path.
    pub prefix: Option<PathBuf>,
}

impl Environment {
    /// Capture the process environment and the merged config files.
    ///
    /// Environment variables take precedence over project config, which
    /// takes precedence over global config.
    pub fn from_process() -> Self {
        let config = load_config_files();

        Environment {
            version_override: env::var(VERSION_ENV).ok().or(config.llvm.version),
            search_path: env::var_os(TOOL_PATH_ENV),
            config_tool: config.llvm.config_tool,
            prefix: config.llvm.prefix,
        }
    }

    /// Locate an executable, preferring the configured prefix.
    pub fn find_tool(&self, name: &str) -> Option<PathBuf> {
        if let Some(prefix) = &self.prefix {
            let candidate = prefix.join("bin").join(search::executable_name(name));
            if search::is_executable(&candidate) {
                return Some(candidate);
            }
        }

        search::find_in(name, self.search_path.as_deref())
    }
}

fn load_config_files() -> ToolkitConfig {
    let project = config::project_config_path(Path::new("."));
    match config::global_config_path() {
        Some(global) => config::load_merged_config(&global, &project),
        None => ToolkitConfig::load_or_default(&project),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_tool_misses_on_empty_search_path() {
        let tmp = TempDir::new().unwrap();
        let env = Environment {
            search_path: Some(tmp.path().into()),
            ..Default::default()
        };

        assert_eq!(env.find_tool("llc"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_tool_prefers_prefix() {
        use std::os::unix::fs::PermissionsExt;

        let prefix = TempDir::new().unwrap();
        let path_dir = TempDir::new().unwrap();

        let bin = prefix.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        for dir in [bin.as_path(), path_dir.path()] {
            let tool = dir.join("opt");
            std::fs::write(&tool, "#!/bin/sh\n").unwrap();
            std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let env = Environment {
            search_path: Some(path_dir.path().into()),
            prefix: Some(prefix.path().to_path_buf()),
            ..Default::default()
        };

        assert_eq!(env.find_tool("opt"), Some(bin.join("opt")));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_tool_falls_back_to_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let prefix = TempDir::new().unwrap(); // no bin/ inside
        let path_dir = TempDir::new().unwrap();

        let tool = path_dir.path().join("llc");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let env = Environment {
            search_path: Some(path_dir.path().into()),
            prefix: Some(prefix.path().to_path_buf()),
            ..Default::default()
        };

        assert_eq!(env.find_tool("llc"), Some(tool));
    }
}
