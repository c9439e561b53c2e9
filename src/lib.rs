//! Gangway - runtime discovery and FFI bindings for the LLVM C API
//!
//! This crate locates an installed LLVM toolkit at runtime (query tool,
//! shared libraries, companion executables), loads the main shared library,
//! and exposes version-gated function tables over its C ABI, together with
//! a safe wrapper for target data-layout queries.

pub mod bindings;
pub mod core;
pub mod discovery;
pub mod ffi;
pub mod ops;
pub mod target_data;
pub mod util;

/// Test fakes, only compiled for unit tests.
#[cfg(test)]
pub mod test_support;

pub use crate::core::platform::Platform;
pub use crate::core::version::Version;
pub use crate::discovery::{installation, Installation};
pub use crate::target_data::{ByteOrder, TargetData, TargetDataError};
