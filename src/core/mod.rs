//! Core value types for toolkit discovery.
//!
//! This module contains the foundational types used throughout gangway:
//! - Toolkit versions with minor-level ordering
//! - Static platform knowledge (library names, architectures, backends)

pub mod platform;
pub mod version;

pub use self::platform::{Platform, PlatformError};
pub use self::version::{Version, VersionError};
