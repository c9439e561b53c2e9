//! Function table for the link-time-optimization C API surface.
//!
//! Only the introspection entry points are bound. `lto_api_version`
//! appeared in 3.4; before that the expected API revision is known only
//! from [`KNOWN_LTO_API_VERSIONS`].

use std::ffi::{c_char, c_uint, CStr};

use crate::core::version::Version;
use crate::ffi::{LibraryError, SymbolBinder, SymbolSource, VersionRange, VersionedValue};

/// First version whose LTO library exports `lto_api_version`.
pub const LTO_API_VERSION_MIN: Version = Version::new(3, 4, 0);

/// API revision each tested toolkit line ships with.
pub const KNOWN_LTO_API_VERSIONS: VersionedValue<u32> = VersionedValue::new(&[
    (
        VersionRange::between(Version::new(3, 1, 0), Version::new(3, 3, 0)),
        4,
    ),
    (
        VersionRange::between(Version::new(3, 4, 0), Version::new(3, 4, 0)),
        5,
    ),
    (VersionRange::at_least(Version::new(3, 5, 0)), 10),
]);

/// Resolved entry points of the LTO C API.
#[derive(Debug, Clone, Copy)]
pub struct LtoApi {
    pub get_version: unsafe extern "C" fn() -> *const c_char,
    pub get_error_message: unsafe extern "C" fn() -> *const c_char,
    pub api_version: Option<unsafe extern "C" fn() -> c_uint>,
}

impl LtoApi {
    /// Bind the table against the binder's library and discovered version.
    ///
    /// # Safety
    ///
    /// Same contract as [`CoreApi::build`](crate::bindings::CoreApi::build).
    pub unsafe fn build<S: SymbolSource + ?Sized>(
        binder: &SymbolBinder<'_, S>,
    ) -> Result<Self, LibraryError> {
        Ok(LtoApi {
            get_version: binder.required("lto_get_version")?,
            get_error_message: binder.required("lto_get_error_message")?,
            api_version: binder.gated(
                "lto_api_version",
                VersionRange::at_least(LTO_API_VERSION_MIN),
            )?,
        })
    }

    /// Human-readable version banner, e.g. `LLVM version 3.4`.
    pub fn version_string(&self) -> Option<String> {
        // Safety: lto_get_version returns a static string owned by the
        // library, or null.
        let raw = unsafe { (self.get_version)() };
        if raw.is_null() {
            return None;
        }
        let text = unsafe { CStr::from_ptr(raw) };
        Some(text.to_string_lossy().into_owned())
    }

    /// API revision reported by the library itself, when it can.
    pub fn runtime_api_version(&self) -> Option<u32> {
        // Safety: no arguments, no state; the entry point only reads a
        // compiled-in constant.
        self.api_version.map(|f| unsafe { f() })
    }

    /// API revision a toolkit of `version` is expected to report.
    pub fn expected_api_version(version: Version) -> Option<u32> {
        KNOWN_LTO_API_VERSIONS.resolve(version)
    }
}
