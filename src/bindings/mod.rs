//! Typed, version-gated tables over the toolkit's C ABI.
//!
//! Tables are built once per process against the discovered libraries and
//! shared by reference afterwards. A symbol the discovered version does not
//! export is simply absent from its table; callers branch on presence, not
//! on version checks of their own.

pub mod core;
pub mod lto;

pub use self::core::CoreApi;
pub use self::lto::LtoApi;

use std::sync::OnceLock;

use thiserror::Error;

use crate::discovery::{self, DiscoveryError};
use crate::ffi::{LibraryError, SymbolBinder};

/// Error building an API table.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Library(#[from] LibraryError),
}

static CORE_API: OnceLock<Result<CoreApi, ApiError>> = OnceLock::new();
static LTO_API: OnceLock<Result<Option<LtoApi>, ApiError>> = OnceLock::new();

/// The core API table, bound against the discovered main library.
pub fn core_api() -> Result<&'static CoreApi, ApiError> {
    let entry = CORE_API.get_or_init(|| {
        let installation = discovery::installation()?;
        let binder = SymbolBinder::new(&installation.library, installation.effective_version());
        // Safety: the table's declared signatures are the C API contract of
        // the library discovery just loaded, and that library stays loaded
        // for the life of the process.
        unsafe { CoreApi::build(&binder) }.map_err(ApiError::from)
    });

    entry.as_ref().map_err(|e| e.clone())
}

/// The LTO API table, or `None` when discovery found no LTO library.
pub fn lto_api() -> Result<Option<&'static LtoApi>, ApiError> {
    let entry = LTO_API.get_or_init(|| {
        let installation = discovery::installation()?;
        let Some(library) = installation.lto_library.as_ref() else {
            return Ok(None);
        };
        let binder = SymbolBinder::new(library, installation.effective_version());
        // Safety: same contract as the core table.
        unsafe { LtoApi::build(&binder) }
            .map(Some)
            .map_err(ApiError::from)
    });

    match entry {
        Ok(table) => Ok(table.as_ref()),
        Err(e) => Err(e.clone()),
    }
}
