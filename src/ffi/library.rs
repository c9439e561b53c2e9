//! Shared-library loading and raw symbol resolution.

use std::ffi::c_void;
use std::path::Path;

use thiserror::Error;

/// Error loading a library or resolving a symbol.
///
/// Loader errors are captured as text so the type stays `Clone`; the
/// process-wide discovery result needs to hand out the same error to
/// every caller.
#[derive(Debug, Clone, Error)]
pub enum LibraryError {
    #[error("failed to load `{name}`: {message}")]
    Load { name: String, message: String },

    #[error("`{library}` does not export `{symbol}`: {message}")]
    Symbol {
        library: String,
        symbol: String,
        message: String,
    },
}

/// Anything symbols can be resolved from.
///
/// The production implementation is [`SharedLibrary`]. Tests substitute an
/// in-process table of `extern "C"` functions, which is what makes the
/// gating logic checkable without a toolkit installed.
pub trait SymbolSource {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Resolve an exported symbol to its raw address.
    fn symbol_address(&self, symbol: &str) -> Result<*mut c_void, LibraryError>;
}

/// A shared library opened through the platform's dynamic loader.
///
/// Loading has OS-level side effects (pages are mapped, constructors may
/// run). Opening the same path twice yields two independent handles.
pub struct SharedLibrary {
    inner: libloading::Library,
    name: String,
}

impl SharedLibrary {
    /// Open a library at an explicit path.
    pub fn open(path: &Path) -> Result<Self, LibraryError> {
        Self::load(path.as_os_str(), path.display().to_string())
    }

    /// Open a library by bare filename, letting the loader consult its
    /// default search path.
    pub fn open_name(name: &str) -> Result<Self, LibraryError> {
        Self::load(name.as_ref(), name.to_string())
    }

    fn load(what: &std::ffi::OsStr, name: String) -> Result<Self, LibraryError> {
        // Safety: the library's initializers are outside our control; we
        // only load libraries the operator installed.
        let inner = unsafe { libloading::Library::new(what) }.map_err(|e| LibraryError::Load {
            name: name.clone(),
            message: e.to_string(),
        })?;

        Ok(SharedLibrary { inner, name })
    }

    /// Display name (path or filename) this library was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read a data symbol as a value snapshot.
    ///
    /// # Safety
    ///
    /// The symbol must name a global of type `T` in this library.
    pub unsafe fn read_global<T: Copy>(&self, symbol: &str) -> Result<T, LibraryError> {
        let address = self.symbol_address(symbol)?;
        Ok(std::ptr::read(address as *const T))
    }
}

impl SymbolSource for SharedLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbol_address(&self, symbol: &str) -> Result<*mut c_void, LibraryError> {
        // Safety: the symbol is read as a raw address only; typed use goes
        // through SymbolBinder, which owns that contract.
        let address: libloading::Symbol<'_, *mut c_void> =
            unsafe { self.inner.get(symbol.as_bytes()) }.map_err(|e| LibraryError::Symbol {
                library: self.name.clone(),
                symbol: symbol.to_string(),
                message: e.to_string(),
            })?;

        Ok(*address)
    }
}

impl std::fmt::Debug for SharedLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedLibrary")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_library_fails() {
        let err = SharedLibrary::open_name("libgangway-does-not-exist.so").unwrap_err();
        assert!(matches!(err, LibraryError::Load { .. }));
        assert!(err.to_string().contains("libgangway-does-not-exist.so"));
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn test_resolve_symbol_from_libc() {
        let libc = SharedLibrary::open_name("libc.so.6").unwrap();

        let strlen = libc.symbol_address("strlen").unwrap();
        assert!(!strlen.is_null());

        let missing = libc.symbol_address("gangway_no_such_symbol").unwrap_err();
        assert!(matches!(missing, LibraryError::Symbol { .. }));
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn test_independent_handles_for_same_path() {
        let a = SharedLibrary::open_name("libc.so.6").unwrap();
        let b = SharedLibrary::open_name("libc.so.6").unwrap();

        // Both resolve; dropping one must not invalidate the other.
        assert!(!a.symbol_address("strlen").unwrap().is_null());
        drop(a);
        assert!(!b.symbol_address("strlen").unwrap().is_null());
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn test_read_global_snapshot() {
        let libc = SharedLibrary::open_name("libc.so.6").unwrap();

        // `environ` is a char** global; the snapshot itself is a pointer.
        let environ: *mut std::ffi::c_void = unsafe { libc.read_global("environ") }.unwrap();
        assert!(!environ.is_null());
    }
}
