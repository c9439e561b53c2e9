//! Opaque handle types for the toolkit's C ABI.
//!
//! Each handle kind gets its own `#[repr(transparent)]` newtype over a raw
//! pointer so that a context cannot be passed where a type is expected.
//! The newtypes carry no behavior, only identity.

use std::ffi::c_void;
use std::os::raw::c_int;

/// The C ABI's boolean (a plain `int`).
pub type LlvmBool = c_int;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(*mut c_void);

        impl $name {
            /// Wrap a raw pointer produced by the toolkit.
            ///
            /// # Safety
            ///
            /// The pointer must be null or a live handle of this kind
            /// returned by the loaded library.
            pub const unsafe fn from_raw(raw: *mut c_void) -> Self {
                $name(raw)
            }

            pub const fn null() -> Self {
                $name(std::ptr::null_mut())
            }

            pub fn is_null(self) -> bool {
                self.0.is_null()
            }

            pub const fn as_ptr(self) -> *mut c_void {
                self.0
            }
        }
    };
}

opaque_handle! {
    /// An LLVM context.
    ContextRef
}

opaque_handle! {
    /// An LLVM type.
    TypeRef
}

opaque_handle! {
    /// An LLVM value (used here only for global variables).
    ValueRef
}

opaque_handle! {
    /// A target data-layout descriptor.
    TargetDataRef
}
