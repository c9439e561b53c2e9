//! Version-gated symbol binding.
//!
//! Per-header binding modules declare, for each entry point, the version
//! range in which the toolkit exports it. `SymbolBinder` resolves the
//! entries that apply to the discovered version and skips the rest, so a
//! table built against LLVM 3.1 simply does not contain the 3.2-only
//! functions. Absence, not a runtime check, is the enforcement mechanism.

use std::ffi::c_void;
use std::mem;

use crate::core::version::Version;
use crate::ffi::library::{LibraryError, SymbolSource};

/// An inclusive version range. `None` bounds are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    min: Option<Version>,
    max: Option<Version>,
}

impl VersionRange {
    pub const fn any() -> Self {
        VersionRange {
            min: None,
            max: None,
        }
    }

    pub const fn at_least(min: Version) -> Self {
        VersionRange {
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(max: Version) -> Self {
        VersionRange {
            min: None,
            max: Some(max),
        }
    }

    pub const fn between(min: Version, max: Version) -> Self {
        VersionRange {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether a discovered version falls inside this range.
    pub fn admits(&self, version: Version) -> bool {
        if let Some(min) = self.min {
            if version < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if version > max {
                return false;
            }
        }
        true
    }
}

/// A constant whose value depends on the toolkit version, expressed as
/// disjoint version brackets.
#[derive(Debug, Clone, Copy)]
pub struct VersionedValue<T: 'static> {
    brackets: &'static [(VersionRange, T)],
}

impl<T: Copy> VersionedValue<T> {
    pub const fn new(brackets: &'static [(VersionRange, T)]) -> Self {
        VersionedValue { brackets }
    }

    /// The value for `version`, or `None` when no bracket covers it.
    pub fn resolve(&self, version: Version) -> Option<T> {
        self.brackets
            .iter()
            .find(|(range, _)| range.admits(version))
            .map(|(_, value)| *value)
    }
}

/// Resolves typed entry points from a symbol source for one discovered
/// version.
pub struct SymbolBinder<'lib, S: SymbolSource + ?Sized> {
    source: &'lib S,
    version: Version,
}

impl<'lib, S: SymbolSource + ?Sized> SymbolBinder<'lib, S> {
    pub fn new(source: &'lib S, version: Version) -> Self {
        SymbolBinder { source, version }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Resolve a symbol that every supported version exports.
    ///
    /// # Safety
    ///
    /// `F` must be a function-pointer type matching the symbol's actual
    /// C signature, and the source's library must outlive every call made
    /// through the returned pointer.
    pub unsafe fn required<F: Copy>(&self, symbol: &str) -> Result<F, LibraryError> {
        let address = self.source.symbol_address(symbol)?;
        Ok(cast_symbol(address))
    }

    /// Resolve a symbol only when the discovered version falls in `range`.
    ///
    /// Outside the range the entry is absent (`Ok(None)`) and the source
    /// is never consulted, since the symbol may not exist there at all.
    ///
    /// # Safety
    ///
    /// Same contract as [`SymbolBinder::required`].
    pub unsafe fn gated<F: Copy>(
        &self,
        symbol: &str,
        range: VersionRange,
    ) -> Result<Option<F>, LibraryError> {
        if !range.admits(self.version) {
            return Ok(None);
        }
        self.required(symbol).map(Some)
    }
}

/// Reinterpret a raw symbol address as a typed function pointer.
fn cast_symbol<F: Copy>(address: *mut c_void) -> F {
    assert_eq!(
        mem::size_of::<F>(),
        mem::size_of::<*mut c_void>(),
        "symbols can only be bound to pointer-sized types"
    );
    // Safety: sizes match and the caller asserted the signature.
    unsafe { mem::transmute_copy(&address) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeLibrary;

    extern "C" fn add_one(x: u32) -> u32 {
        x + 1
    }

    extern "C" fn double(x: u32) -> u32 {
        x * 2
    }

    type UnaryFn = extern "C" fn(u32) -> u32;

    fn v(major: u32, minor: u32) -> Version {
        Version::new(major, minor, 0)
    }

    #[test]
    fn test_range_admits() {
        let at_least_33 = VersionRange::at_least(v(3, 3));
        assert!(!at_least_33.admits(v(3, 2)));
        assert!(at_least_33.admits(v(3, 3)));
        assert!(at_least_33.admits(v(3, 5)));

        let bracket = VersionRange::between(v(3, 2), v(3, 4));
        assert!(!bracket.admits(v(3, 1)));
        assert!(bracket.admits(v(3, 2)));
        assert!(bracket.admits(v(3, 4)));
        assert!(!bracket.admits(v(3, 5)));

        assert!(VersionRange::any().admits(v(1, 0)));
        assert!(VersionRange::at_most(v(3, 3)).admits(v(3, 3)));
        assert!(!VersionRange::at_most(v(3, 3)).admits(v(3, 4)));
    }

    #[test]
    fn test_range_ignores_patch() {
        let range = VersionRange::at_least(v(3, 2));
        assert!(range.admits(Version::new(3, 2, 9)));
        assert!(!range.admits(Version::new(3, 1, 9)));
    }

    #[test]
    fn test_required_binds_and_calls() {
        let source = FakeLibrary::new("fake").with_symbol("add_one", add_one as *mut c_void);
        let binder = SymbolBinder::new(&source, v(3, 4));

        let f: UnaryFn = unsafe { binder.required("add_one") }.unwrap();
        assert_eq!(f(41), 42);
    }

    #[test]
    fn test_required_missing_symbol_errors() {
        let source = FakeLibrary::new("fake");
        let binder = SymbolBinder::new(&source, v(3, 4));

        let err = unsafe { binder.required::<UnaryFn>("absent") }.unwrap_err();
        assert!(matches!(err, LibraryError::Symbol { .. }));
    }

    #[test]
    fn test_gating_is_monotonic_in_version() {
        let source = FakeLibrary::new("fake").with_symbol("double", double as *mut c_void);
        let range = VersionRange::at_least(v(3, 3));

        for (minor, expected) in [(2, false), (3, true), (5, true)] {
            let binder = SymbolBinder::new(&source, v(3, minor));
            let bound = unsafe { binder.gated::<UnaryFn>("double", range) }.unwrap();
            assert_eq!(bound.is_some(), expected, "minor {minor}");
        }
    }

    #[test]
    fn test_gated_out_of_range_never_consults_source() {
        // The symbol is absent from the source; gating below the minimum
        // must still succeed with None.
        let source = FakeLibrary::new("fake");
        let binder = SymbolBinder::new(&source, v(3, 1));

        let bound = unsafe { binder.gated::<UnaryFn>("double", VersionRange::at_least(v(3, 2))) };
        assert!(bound.unwrap().is_none());
    }

    #[test]
    fn test_gated_in_range_missing_symbol_errors() {
        let source = FakeLibrary::new("fake");
        let binder = SymbolBinder::new(&source, v(3, 4));

        let err = unsafe { binder.gated::<UnaryFn>("double", VersionRange::any()) }.unwrap_err();
        assert!(matches!(err, LibraryError::Symbol { .. }));
    }

    #[test]
    fn test_versioned_value_brackets() {
        const CODES: VersionedValue<u32> = VersionedValue::new(&[
            (VersionRange::at_most(Version::new(3, 2, 0)), 7),
            (VersionRange::at_least(Version::new(3, 3, 0)), 9),
        ]);

        assert_eq!(CODES.resolve(v(3, 1)), Some(7));
        assert_eq!(CODES.resolve(v(3, 2)), Some(7));
        assert_eq!(CODES.resolve(v(3, 3)), Some(9));
        assert_eq!(CODES.resolve(v(4, 0)), Some(9));
    }

    #[test]
    fn test_versioned_value_uncovered_version() {
        const GAP: VersionedValue<u32> =
            VersionedValue::new(&[(
                VersionRange::between(Version::new(3, 3, 0), Version::new(3, 4, 0)),
                1,
            )]);

        assert_eq!(GAP.resolve(v(3, 2)), None);
        assert_eq!(GAP.resolve(v(3, 5)), None);
    }
}
