//! Runtime discovery of an installed LLVM toolkit.
//!
//! Discovery runs once per process and memoizes its outcome, failure
//! included. The sequence is: capture the environment, settle on a
//! version, ask the query tool for paths, load the shared libraries,
//! locate the companion executables, and pick a C compiler. Only the main
//! shared library is mandatory; every other missing piece downgrades to a
//! warning and leaves its field empty.

pub mod config_tool;
pub mod environment;

pub use self::config_tool::{versioned_tool_name, ConfigTool, ConfigToolError, CONFIG_TOOL};
pub use self::environment::Environment;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::platform::{self, Platform, PlatformError};
use crate::core::version::{Version, VersionError};
use crate::ffi::SharedLibrary;
use crate::util::search;

/// Companion executable names, as the toolkit ships them.
pub const CODE_GENERATOR_TOOL: &str = "llc";
pub const INTERPRETER_TOOL: &str = "lli";
pub const OPTIMIZER_TOOL: &str = "opt";
pub const LINKER_TOOL: &str = "llvm-link";
pub const FRONT_END_TOOL: &str = "clang";

/// Generically named C compilers, in probe order.
const GENERIC_C_COMPILERS: &[&str] = &["gcc", "cc"];

/// Fatal discovery failure.
///
/// `Clone` because the memoized outcome is handed to every caller.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
pub enum DiscoveryError {
    #[error(transparent)]
    #[diagnostic(
        code(gangway::discovery::platform),
        help("this binding knows the library naming conventions of linux, freebsd, macos and windows only")
    )]
    Platform(#[from] PlatformError),

    #[error("invalid version override: {0}")]
    #[diagnostic(
        code(gangway::discovery::bad_override),
        help("set GANGWAY_LLVM_VERSION to `X.Y` or `X.Y.Z`, or remove it to autodetect")
    )]
    InvalidVersionOverride(#[from] VersionError),

    #[error("no usable LLVM shared library was found (tried {})", .tried.join(", "))]
    #[diagnostic(
        code(gangway::discovery::no_library),
        help("install an LLVM toolkit, or point GANGWAY_LLVM_VERSION or ~/.gangway/config.toml at an existing installation")
    )]
    MainLibraryNotFound { tried: Vec<String> },
}

/// Companion executables, each optional.
#[derive(Debug, Clone, Default)]
pub struct CompanionTools {
    /// `llc`
    pub code_generator: Option<PathBuf>,
    /// `lli`
    pub interpreter: Option<PathBuf>,
    /// `opt`
    pub optimizer: Option<PathBuf>,
    /// `llvm-link`
    pub linker: Option<PathBuf>,
    /// `clang`
    pub front_end: Option<PathBuf>,
}

/// A discovered toolkit installation.
#[derive(Debug)]
pub struct Installation {
    /// Settled version, when any source reported one.
    pub version: Option<Version>,
    /// The query tool answering path questions, when one was found.
    pub config_tool: Option<ConfigTool>,
    /// Directory holding the companion executables.
    pub bindir: Option<PathBuf>,
    /// Directory holding the shared libraries.
    pub libdir: Option<PathBuf>,
    /// Triple the toolkit was built for.
    pub host_triple: Option<String>,
    /// Backends the toolkit reports, verbatim.
    pub targets: Vec<String>,
    /// The main shared library. Discovery fails without it.
    pub library: SharedLibrary,
    /// The LTO companion library, when it loaded.
    pub lto_library: Option<SharedLibrary>,
    /// Companion executables.
    pub tools: CompanionTools,
    /// Generically named C compiler (`gcc` or `cc`) from the search path.
    pub generic_c_compiler: Option<PathBuf>,
    /// C compiler chosen for driving link steps.
    pub c_compiler: Option<PathBuf>,
}

impl Installation {
    /// The version symbol gates are evaluated against.
    ///
    /// Falls back to the newest validated version when discovery could
    /// not determine one.
    pub fn effective_version(&self) -> Version {
        self.version.unwrap_or(platform::TESTED_VERSIONS[0])
    }
}

/// Outcome of version resolution: which version to target, and which
/// query tool (if any) answers for it.
#[derive(Debug, Default)]
pub struct ResolvedToolkit {
    pub version: Option<Version>,
    pub config_tool: Option<ConfigTool>,
}

/// Settle on a toolkit version and query tool.
///
/// A malformed version override is the one fatal case: the operator asked
/// for something specific and we cannot honor it. Everything else falls
/// through, newest candidate first.
pub fn resolve_version(env: &Environment) -> Result<ResolvedToolkit, DiscoveryError> {
    let override_version = env
        .version_override
        .as_deref()
        .map(Version::parse)
        .transpose()?;

    // An explicitly configured tool short-circuits the search.
    if let Some(path) = &env.config_tool {
        let tool = ConfigTool::new(path.clone());
        if let Some(version) = override_version {
            return Ok(ResolvedToolkit {
                version: Some(version),
                config_tool: Some(tool),
            });
        }
        match tool.version() {
            Ok(version) => {
                return Ok(ResolvedToolkit {
                    version: Some(version),
                    config_tool: Some(tool),
                })
            }
            // The operator named this tool; it still answers path
            // questions even though its version query failed.
            Err(e) => {
                warn!("configured query tool {}: {e}", path.display());
                return Ok(ResolvedToolkit {
                    version: None,
                    config_tool: Some(tool),
                });
            }
        }
    }

    // An override version is trusted as-is; its versioned tool spelling is
    // only located to answer path questions later.
    if let Some(version) = override_version {
        let name = versioned_tool_name(version);
        let config_tool = env.find_tool(&name).map(ConfigTool::new);
        if config_tool.is_none() {
            warn!("`{name}` was not found; keeping version {version} without a query tool");
        }
        return Ok(ResolvedToolkit {
            version: Some(version),
            config_tool,
        });
    }

    // The unversioned tool, then versioned spellings newest to oldest.
    if let Some(path) = env.find_tool(CONFIG_TOOL) {
        let tool = ConfigTool::new(path);
        match tool.version() {
            Ok(version) => {
                return Ok(ResolvedToolkit {
                    version: Some(version),
                    config_tool: Some(tool),
                })
            }
            Err(e) => warn!("{}: {e}", tool.path().display()),
        }
    }

    for &candidate in platform::TESTED_VERSIONS {
        let name = versioned_tool_name(candidate);
        let Some(path) = env.find_tool(&name) else {
            continue;
        };
        let tool = ConfigTool::new(path);
        match tool.version() {
            // The tool's own answer wins over the name it was found by.
            Ok(version) => {
                return Ok(ResolvedToolkit {
                    version: Some(version),
                    config_tool: Some(tool),
                })
            }
            Err(e) => warn!("{}: {e}", tool.path().display()),
        }
    }

    debug!("no query tool found on the search path");
    Ok(ResolvedToolkit::default())
}

/// Main-library filenames to try, in order: the settled version first,
/// then the remaining validated versions newest to oldest.
pub fn library_candidates(platform: &Platform, version: Option<Version>) -> Vec<(Version, String)> {
    let mut candidates: Vec<(Version, String)> = Vec::new();

    for v in version
        .into_iter()
        .chain(platform::TESTED_VERSIONS.iter().copied())
    {
        let name = platform.main_library_name(v);
        if !candidates.iter().any(|(_, existing)| *existing == name) {
            candidates.push((v, name));
        }
    }

    candidates
}

struct LoadedLibraries {
    library: SharedLibrary,
    lto_library: Option<SharedLibrary>,
    version: Option<Version>,
}

fn load_libraries(
    platform: &Platform,
    resolved: Option<Version>,
    libdir: Option<&Path>,
) -> Result<LoadedLibraries, DiscoveryError> {
    let mut tried = Vec::new();
    let mut loaded: Option<(SharedLibrary, Option<Version>)> = None;

    // The libdir reported by the query tool is authoritative when it works.
    if let (Some(libdir), Some(version)) = (libdir, resolved) {
        let path = libdir.join(platform.main_library_name(version));
        match SharedLibrary::open(&path) {
            Ok(library) => {
                debug!("loaded {}", path.display());
                loaded = Some((library, Some(version)));
            }
            Err(e) => {
                warn!("{e}");
                tried.push(path.display().to_string());
            }
        }
    }

    // Otherwise let the system loader search its default locations. A hit
    // fixes the version: whatever spelling loaded is what we are bound to.
    if loaded.is_none() {
        for (version, name) in library_candidates(platform, resolved) {
            match SharedLibrary::open_name(&name) {
                Ok(library) => {
                    debug!("loaded {name} from the system search path");
                    loaded = Some((library, Some(version)));
                    break;
                }
                Err(_) => tried.push(name),
            }
        }
    }

    let Some((library, version)) = loaded else {
        return Err(DiscoveryError::MainLibraryNotFound { tried });
    };

    // The LTO library sits next to the main one; there is no system-path
    // probing for it.
    let lto_library = match libdir {
        Some(libdir) => {
            let path = libdir.join(platform.lto_library_name());
            match SharedLibrary::open(&path) {
                Ok(library) => Some(library),
                Err(e) => {
                    warn!("{e}");
                    None
                }
            }
        }
        None => {
            debug!("no library directory known, skipping the LTO library");
            None
        }
    };

    Ok(LoadedLibraries {
        library,
        lto_library,
        version,
    })
}

fn locate_tools(env: &Environment, bindir: Option<&Path>) -> CompanionTools {
    // Without a binary directory, only the front end is searched by name.
    let Some(bindir) = bindir else {
        debug!("no binary directory known, searching the path for {FRONT_END_TOOL} only");
        let front_end = env.find_tool(FRONT_END_TOOL);
        if front_end.is_none() {
            warn!("companion tool `{FRONT_END_TOOL}` was not found");
        }
        return CompanionTools {
            front_end,
            ..CompanionTools::default()
        };
    };

    let locate = |name: &str| {
        let candidate = bindir.join(search::executable_name(name));
        if search::is_executable(&candidate) {
            Some(candidate)
        } else {
            warn!("companion tool `{name}` was not found under {}", bindir.display());
            None
        }
    };

    CompanionTools {
        code_generator: locate(CODE_GENERATOR_TOOL),
        interpreter: locate(INTERPRETER_TOOL),
        optimizer: locate(OPTIMIZER_TOOL),
        linker: locate(LINKER_TOOL),
        front_end: locate(FRONT_END_TOOL),
    }
}

fn locate_generic_c_compiler(env: &Environment) -> Option<PathBuf> {
    for name in GENERIC_C_COMPILERS {
        if let Some(path) = env.find_tool(name) {
            return Some(path);
        }
    }

    warn!("no generically named C compiler was found (tried gcc, cc)");
    None
}

fn select_c_compiler(front_end: Option<&Path>, generic: Option<&Path>) -> Option<PathBuf> {
    // The toolkit's own front end is the first choice.
    let chosen = front_end.or(generic).map(Path::to_path_buf);
    if chosen.is_none() {
        warn!("no C compiler was found (tried clang, gcc, cc)");
    }
    chosen
}

fn warn_on_err<T>(result: Result<T, ConfigToolError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

/// Run the full discovery sequence against `env`.
///
/// This is the uncached engine; most callers want [`installation`].
pub fn discover(env: &Environment) -> Result<Installation, DiscoveryError> {
    let platform = Platform::host()?;
    debug!(
        "discovering an LLVM toolkit for {}/{}",
        platform.os, platform.arch
    );

    let resolved = resolve_version(env)?;

    // Path queries are best-effort: a failing tool leaves the fields
    // unknown and discovery keeps going.
    let mut bindir = None;
    let mut libdir = None;
    let mut host_triple = None;
    let mut targets = Vec::new();

    if let Some(tool) = &resolved.config_tool {
        bindir = warn_on_err(tool.bindir());
        libdir = warn_on_err(tool.libdir());
        host_triple = warn_on_err(tool.host_triple());
        targets = warn_on_err(tool.built_targets()).unwrap_or_default();
    }

    let libraries = load_libraries(&platform, resolved.version, libdir.as_deref())?;

    let tools = locate_tools(env, bindir.as_deref());
    let generic_c_compiler = locate_generic_c_compiler(env);
    let c_compiler = select_c_compiler(tools.front_end.as_deref(), generic_c_compiler.as_deref());

    let installation = Installation {
        version: libraries.version,
        config_tool: resolved.config_tool,
        bindir,
        libdir,
        host_triple,
        targets,
        library: libraries.library,
        lto_library: libraries.lto_library,
        tools,
        generic_c_compiler,
        c_compiler,
    };

    // Final validation pass.
    match installation.version {
        Some(version) if !platform::is_tested(version) => {
            warn!("LLVM {version} has not been validated with this binding");
        }
        None => warn!(
            "no toolkit version could be determined; assuming {}",
            installation.effective_version()
        ),
        _ => {}
    }
    for target in &installation.targets {
        if !platform::is_known_target(target) {
            warn!("backend `{target}` is not recognized by this binding");
        }
    }

    info!(
        "using LLVM {} from {}",
        installation.effective_version(),
        installation.library.name()
    );

    Ok(installation)
}

static INSTALLATION: OnceLock<Result<Installation, DiscoveryError>> = OnceLock::new();

/// The process-wide installation, discovered on first use.
///
/// The outcome is memoized, failure included; later calls never retry.
pub fn installation() -> Result<&'static Installation, DiscoveryError> {
    let entry = INSTALLATION.get_or_init(|| discover(&Environment::from_process()));
    entry.as_ref().map_err(|e| e.clone())
}
