//! Running the toolkit's query tool.
//!
//! `llvm-config` answers one flag per invocation and prints the answer on
//! stdout. Installations ship it either under its plain name or with a
//! `-X.Y` suffix, and development builds decorate the reported version
//! with suffixes like `svn` that have to be stripped before parsing.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::version::{Version, VersionError};
use crate::util::process::ProcessBuilder;

/// Base name of the toolkit's query tool.
pub const CONFIG_TOOL: &str = "llvm-config";

/// The version-suffixed spelling, e.g. `llvm-config-3.5`.
pub fn versioned_tool_name(version: Version) -> String {
    format!("{}-{}.{}", CONFIG_TOOL, version.major, version.minor)
}

/// Error running or interpreting the query tool.
#[derive(Debug, Error)]
pub enum ConfigToolError {
    #[error("failed to run `{command}`: {message}")]
    Invocation { command: String, message: String },

    #[error("`{command}` exited with status {status}: {stderr}")]
    Failed {
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("`{command}` reported an unparseable version")]
    BadVersion {
        command: String,
        #[source]
        source: VersionError,
    },
}

/// A located query tool.
#[derive(Debug, Clone)]
pub struct ConfigTool {
    path: PathBuf,
}

impl ConfigTool {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigTool { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The toolkit version the tool reports.
    pub fn version(&self) -> Result<Version, ConfigToolError> {
        let text = self.query("--version")?;
        Version::parse(sanitize_version_text(&text)).map_err(|source| {
            ConfigToolError::BadVersion {
                command: format!("{} --version", self.path.display()),
                source,
            }
        })
    }

    /// Directory holding the companion executables.
    pub fn bindir(&self) -> Result<PathBuf, ConfigToolError> {
        self.query("--bindir").map(PathBuf::from)
    }

    /// Directory holding the shared libraries.
    pub fn libdir(&self) -> Result<PathBuf, ConfigToolError> {
        self.query("--libdir").map(PathBuf::from)
    }

    /// Triple the toolkit was built for.
    pub fn host_triple(&self) -> Result<String, ConfigToolError> {
        self.query("--host-target")
    }

    /// Backends the toolkit was built with.
    pub fn built_targets(&self) -> Result<Vec<String>, ConfigToolError> {
        let text = self.query("--targets-built")?;
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    fn query(&self, flag: &str) -> Result<String, ConfigToolError> {
        let builder = ProcessBuilder::new(&self.path).arg(flag);
        let command = builder.display_command();

        let output = builder.exec().map_err(|e| ConfigToolError::Invocation {
            command: command.clone(),
            message: format!("{e:#}"),
        })?;

        if !output.status.success() {
            return Err(ConfigToolError::Failed {
                command,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Strip trailing decorations like `svn` or `rc2` from a reported
/// version, keeping the leading digits-and-dots run.
fn sanitize_version_text(text: &str) -> &str {
    let end = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    text[..end].trim_end_matches('.')
}
