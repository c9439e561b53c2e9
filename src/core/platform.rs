//! Static platform and machine knowledge.
//!
//! Everything here is a hardcoded table: how each operating system names
//! the toolkit's shared libraries, what LLVM calls each processor, which
//! backends exist, and which toolkit releases this binding has been
//! validated against. There is no behavior beyond lookup.

use thiserror::Error;

use crate::core::version::Version;

/// Shared-library filename patterns for one operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryPatterns {
    /// Main library, parametrized by `{major}`/`{minor}`.
    pub main: &'static str,
    /// LTO companion library, located relative to the main library's
    /// directory.
    pub lto: &'static str,
}

/// Host platform facts resolved from OS and CPU identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Operating system identifier (`std::env::consts::OS` vocabulary).
    pub os: &'static str,
    /// LLVM's name for the host processor architecture.
    pub arch: &'static str,
    /// Library filename patterns for this OS.
    pub patterns: LibraryPatterns,
}

/// Unknown OS or CPU. There is no sensible default naming convention to
/// fall back to, so discovery treats this as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("no shared-library naming convention is known for operating system `{os}`")]
    UnsupportedOs { os: String },

    #[error("no toolkit architecture name is known for processor `{arch}`")]
    UnsupportedArch { arch: String },
}

impl Platform {
    /// Resolve the platform this process is running on.
    pub fn host() -> Result<Platform, PlatformError> {
        Platform::for_identifiers(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Resolve a platform from explicit identifiers.
    pub fn for_identifiers(os: &str, arch: &str) -> Result<Platform, PlatformError> {
        let (os, patterns) = library_patterns(os).ok_or_else(|| PlatformError::UnsupportedOs {
            os: os.to_string(),
        })?;
        let arch = architecture_name(arch).ok_or_else(|| PlatformError::UnsupportedArch {
            arch: arch.to_string(),
        })?;

        Ok(Platform { os, arch, patterns })
    }

    /// Filename of the main shared library for the given toolkit version.
    pub fn main_library_name(&self, version: Version) -> String {
        version.substitute(self.patterns.main)
    }

    /// Filename of the LTO companion library.
    pub fn lto_library_name(&self) -> &'static str {
        self.patterns.lto
    }
}

fn library_patterns(os: &str) -> Option<(&'static str, LibraryPatterns)> {
    match os {
        "linux" => Some((
            "linux",
            LibraryPatterns {
                main: "libLLVM-{major}.{minor}.so.1",
                lto: "libLTO.so",
            },
        )),
        "freebsd" => Some((
            "freebsd",
            LibraryPatterns {
                main: "libLLVM-{major}.{minor}.so.1",
                lto: "libLTO.so",
            },
        )),
        "macos" => Some((
            "macos",
            LibraryPatterns {
                main: "libLLVM-{major}.{minor}.dylib",
                lto: "libLTO.dylib",
            },
        )),
        "windows" => Some((
            "windows",
            LibraryPatterns {
                main: "LLVM-{major}.{minor}.dll",
                lto: "LTO.dll",
            },
        )),
        _ => None,
    }
}

fn architecture_name(arch: &str) -> Option<&'static str> {
    match arch {
        "x86" | "x86_64" => Some("X86"),
        "arm" => Some("ARM"),
        "aarch64" => Some("AArch64"),
        "mips" | "mips64" => Some("Mips"),
        "powerpc" | "powerpc64" => Some("PowerPC"),
        "s390x" => Some("SystemZ"),
        "sparc64" => Some("Sparc"),
        _ => None,
    }
}

/// Backend names shipped by the toolkit releases this binding tracks.
pub const KNOWN_TARGETS: &[&str] = &[
    "AArch64", "ARM", "CppBackend", "Hexagon", "Mips", "MSP430", "NVPTX", "PowerPC", "R600",
    "Sparc", "SystemZ", "X86", "XCore",
];

/// Toolkit releases this binding has been validated against, newest first.
/// Discovery probes these in order, so the ordering is load-bearing.
pub const TESTED_VERSIONS: &[Version] = &[
    Version::new(3, 5, 0),
    Version::new(3, 4, 0),
    Version::new(3, 3, 0),
    Version::new(3, 2, 0),
    Version::new(3, 1, 0),
];

/// Whether a backend name reported by the installation is one we know.
pub fn is_known_target(name: &str) -> bool {
    KNOWN_TARGETS.contains(&name)
}

/// Whether a version is in the validated list. Patch levels do not
/// matter here, matching `Version` equality.
pub fn is_tested(version: Version) -> bool {
    TESTED_VERSIONS.contains(&version)
}
