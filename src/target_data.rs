//! Safe wrapper around target data layouts.
//!
//! A [`TargetData`] owns one layout handle from creation to destruction
//! and answers size, alignment and offset questions about types laid out
//! under it. How pointer sizes for nonzero address spaces are answered
//! depends on the toolkit generation; the strategy is picked once when
//! the value is built and never re-examined per call.

use std::ffi::{c_uint, CStr, CString, NulError};
use std::fmt;

use thiserror::Error;

use crate::bindings::{self, ApiError, CoreApi};
use crate::ffi::{TargetDataRef, TypeRef, ValueRef};

/// Error creating a target data layout.
#[derive(Debug, Error)]
pub enum TargetDataError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("the toolkit rejected the data layout `{layout}`")]
    Rejected { layout: String },

    #[error("data layout strings cannot contain NUL bytes")]
    EmbeddedNul(#[from] NulError),
}

/// Byte ordering of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::BigEndian => write!(f, "big-endian"),
            ByteOrder::LittleEndian => write!(f, "little-endian"),
        }
    }
}

/// How pointer sizes for explicit address spaces are answered.
#[derive(Debug, Clone, Copy)]
enum PointerSizeStrategy {
    /// The toolkit exports `LLVMPointerSizeForAS`; the resolved entry
    /// point is stored here.
    Direct(unsafe extern "C" fn(TargetDataRef, c_uint) -> c_uint),
    /// Older toolkits: measure a pointer type built in a scratch context.
    LegacyContext,
}

/// An owned target data layout.
#[derive(Debug)]
pub struct TargetData {
    api: &'static CoreApi,
    raw: TargetDataRef,
    pointer_size: PointerSizeStrategy,
}

impl TargetData {
    /// Create a layout from its string form, using the process-wide
    /// toolkit.
    pub fn from_layout(layout: &str) -> Result<Self, TargetDataError> {
        let api = bindings::core_api()?;
        Self::with_api(api, layout)
    }

    /// Create a layout against an explicit API table.
    pub fn with_api(api: &'static CoreApi, layout: &str) -> Result<Self, TargetDataError> {
        let c_layout = CString::new(layout)?;

        // Safety: create_target_data parses and copies the string; it does
        // not retain the pointer.
        let raw = unsafe { (api.create_target_data)(c_layout.as_ptr()) };
        if raw.is_null() {
            return Err(TargetDataError::Rejected {
                layout: layout.to_string(),
            });
        }

        let pointer_size = match api.pointer_size_for_as {
            Some(f) => PointerSizeStrategy::Direct(f),
            None => PointerSizeStrategy::LegacyContext,
        };

        Ok(TargetData {
            api,
            raw,
            pointer_size,
        })
    }

    /// The layout in its canonical string form.
    pub fn string_rep(&self) -> String {
        // Safety: the returned buffer is ours until dispose_message.
        unsafe {
            let raw = (self.api.copy_string_rep_of_target_data)(self.raw);
            if raw.is_null() {
                return String::new();
            }
            let text = CStr::from_ptr(raw).to_string_lossy().into_owned();
            (self.api.dispose_message)(raw);
            text
        }
    }

    /// Byte ordering of the target.
    pub fn byte_order(&self) -> ByteOrder {
        // Safety: the layout handle is live for &self.
        let code = unsafe { (self.api.byte_order)(self.raw) };
        if code == 0 {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Pointer width in bytes for the given address space.
    pub fn pointer_size(&self, address_space: u32) -> u32 {
        match self.pointer_size {
            // Safety: the layout handle is live for &self.
            PointerSizeStrategy::Direct(f) => unsafe { f(self.raw, address_space) },
            PointerSizeStrategy::LegacyContext => {
                if address_space == 0 {
                    // Safety: as above.
                    return unsafe { (self.api.pointer_size)(self.raw) };
                }
                // Safety: the scratch context is created, measured and
                // disposed entirely within this call.
                unsafe {
                    let context = (self.api.context_create)();
                    let pointee = (self.api.int8_type_in_context)(context);
                    let pointer = (self.api.pointer_type)(pointee, address_space);
                    let size = (self.api.abi_size_of_type)(self.raw, pointer) as u32;
                    (self.api.context_dispose)(context);
                    size
                }
            }
        }
    }

    /// Total size of a type in bits, padding included.
    pub fn size_of_type_in_bits(&self, ty: TypeRef) -> u64 {
        // Safety: the layout handle is live; `ty` must be a live type.
        unsafe { (self.api.size_of_type_in_bits)(self.raw, ty) }
    }

    /// Bytes a store of this type writes.
    pub fn store_size_of_type(&self, ty: TypeRef) -> u64 {
        unsafe { (self.api.store_size_of_type)(self.raw, ty) }
    }

    /// Bytes this type occupies in memory, trailing padding included.
    pub fn abi_size_of_type(&self, ty: TypeRef) -> u64 {
        unsafe { (self.api.abi_size_of_type)(self.raw, ty) }
    }

    /// Minimum alignment the ABI requires, in bytes.
    pub fn abi_alignment_of_type(&self, ty: TypeRef) -> u32 {
        unsafe { (self.api.abi_alignment_of_type)(self.raw, ty) }
    }

    /// Alignment used for the type on the call frame, in bytes.
    pub fn call_frame_alignment_of_type(&self, ty: TypeRef) -> u32 {
        unsafe { (self.api.call_frame_alignment_of_type)(self.raw, ty) }
    }

    /// Alignment the code generator prefers, in bytes.
    pub fn preferred_alignment_of_type(&self, ty: TypeRef) -> u32 {
        unsafe { (self.api.preferred_alignment_of_type)(self.raw, ty) }
    }

    /// Preferred alignment of a global value, in bytes.
    pub fn preferred_alignment_of_global(&self, global: ValueRef) -> u32 {
        unsafe { (self.api.preferred_alignment_of_global)(self.raw, global) }
    }

    /// Index of the struct element containing the given byte offset.
    pub fn element_at_offset(&self, struct_type: TypeRef, offset: u64) -> u32 {
        unsafe { (self.api.element_at_offset)(self.raw, struct_type, offset) }
    }

    /// Byte offset of the given struct element.
    pub fn offset_of_element(&self, struct_type: TypeRef, element: u32) -> u64 {
        unsafe { (self.api.offset_of_element)(self.raw, struct_type, element) }
    }

    /// Destroy the layout, consuming the value.
    ///
    /// Dropping does the same; this spelling makes the point of
    /// destruction explicit.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for TargetData {
    fn drop(&mut self) {
        // Safety: raw is live and owned; this is its single destruction.
        unsafe { (self.api.dispose_target_data)(self.raw) };
    }
}
