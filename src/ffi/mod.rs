//! Low-level FFI plumbing: opaque handles, shared-library loading, and
//! version-gated symbol binding.

pub mod gate;
pub mod handles;
pub mod library;

pub use self::gate::{SymbolBinder, VersionRange, VersionedValue};
pub use self::handles::{ContextRef, LlvmBool, TargetDataRef, TypeRef, ValueRef};
pub use self::library::{LibraryError, SharedLibrary, SymbolSource};
