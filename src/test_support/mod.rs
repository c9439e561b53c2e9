//! Test fakes for gangway unit tests.
//!
//! The binder and API tables only ever see symbols through the
//! [`SymbolSource`](crate::ffi::SymbolSource) trait, so tests can stand in an
//! in-process fake instead of a real shared library.

pub mod fake_library;

pub use fake_library::FakeLibrary;
