//! Locating executables on the search path.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Append the platform's executable suffix to a tool name.
pub fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

/// Locate `name` on an explicit search path, or on the process `PATH`.
///
/// `paths` uses the platform's usual separator, like `PATH` itself.
pub fn find_in(name: &str, paths: Option<&OsStr>) -> Option<PathBuf> {
    match paths {
        Some(paths) => {
            let cwd = env::current_dir().unwrap_or_default();
            which::which_in(name, Some(paths), cwd).ok()
        }
        None => which::which(name).ok(),
    }
}

/// Whether `path` names a file the current user could execute.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Whether `path` names a file the current user could execute.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}
