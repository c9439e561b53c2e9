//! Function table for the core C API surface.
//!
//! Covers the target-data layout queries plus the few context and type
//! constructors the layout wrapper needs for scratch types. Symbol names
//! follow the C headers verbatim so the table reads against them.

use std::ffi::{c_char, c_int, c_uint, c_ulonglong};

use crate::core::version::Version;
use crate::ffi::{
    ContextRef, LibraryError, LlvmBool, SymbolBinder, SymbolSource, TargetDataRef, TypeRef,
    ValueRef, VersionRange,
};

/// First version that exports `LLVMPointerSizeForAS`.
pub const POINTER_SIZE_FOR_AS_MIN: Version = Version::new(3, 2, 0);

/// Resolved entry points of the core C API.
///
/// Every supported version exports all of these except
/// `LLVMPointerSizeForAS`, which is absent from tables bound against
/// toolkits older than [`POINTER_SIZE_FOR_AS_MIN`].
#[derive(Debug, Clone, Copy)]
pub struct CoreApi {
    // Target data lifecycle.
    pub create_target_data: unsafe extern "C" fn(*const c_char) -> TargetDataRef,
    pub dispose_target_data: unsafe extern "C" fn(TargetDataRef),
    pub copy_string_rep_of_target_data: unsafe extern "C" fn(TargetDataRef) -> *mut c_char,
    pub dispose_message: unsafe extern "C" fn(*mut c_char),

    // Layout queries.
    pub byte_order: unsafe extern "C" fn(TargetDataRef) -> c_int,
    pub pointer_size: unsafe extern "C" fn(TargetDataRef) -> c_uint,
    pub pointer_size_for_as: Option<unsafe extern "C" fn(TargetDataRef, c_uint) -> c_uint>,
    pub size_of_type_in_bits: unsafe extern "C" fn(TargetDataRef, TypeRef) -> c_ulonglong,
    pub store_size_of_type: unsafe extern "C" fn(TargetDataRef, TypeRef) -> c_ulonglong,
    pub abi_size_of_type: unsafe extern "C" fn(TargetDataRef, TypeRef) -> c_ulonglong,
    pub abi_alignment_of_type: unsafe extern "C" fn(TargetDataRef, TypeRef) -> c_uint,
    pub call_frame_alignment_of_type: unsafe extern "C" fn(TargetDataRef, TypeRef) -> c_uint,
    pub preferred_alignment_of_type: unsafe extern "C" fn(TargetDataRef, TypeRef) -> c_uint,
    pub preferred_alignment_of_global: unsafe extern "C" fn(TargetDataRef, ValueRef) -> c_uint,
    pub element_at_offset: unsafe extern "C" fn(TargetDataRef, TypeRef, c_ulonglong) -> c_uint,
    pub offset_of_element: unsafe extern "C" fn(TargetDataRef, TypeRef, c_uint) -> c_ulonglong,

    // Contexts and scratch types.
    pub context_create: unsafe extern "C" fn() -> ContextRef,
    pub context_dispose: unsafe extern "C" fn(ContextRef),
    pub int8_type_in_context: unsafe extern "C" fn(ContextRef) -> TypeRef,
    pub int64_type_in_context: unsafe extern "C" fn(ContextRef) -> TypeRef,
    pub int_type_in_context: unsafe extern "C" fn(ContextRef, c_uint) -> TypeRef,
    pub pointer_type: unsafe extern "C" fn(TypeRef, c_uint) -> TypeRef,
    pub struct_type_in_context:
        unsafe extern "C" fn(ContextRef, *mut TypeRef, c_uint, LlvmBool) -> TypeRef,
}

impl CoreApi {
    /// Bind the table against the binder's library and discovered version.
    ///
    /// # Safety
    ///
    /// The binder's source must export these symbols with the declared C
    /// signatures, and the underlying library must outlive every call made
    /// through the returned table.
    pub unsafe fn build<S: SymbolSource + ?Sized>(
        binder: &SymbolBinder<'_, S>,
    ) -> Result<Self, LibraryError> {
        Ok(CoreApi {
            create_target_data: binder.required("LLVMCreateTargetData")?,
            dispose_target_data: binder.required("LLVMDisposeTargetData")?,
            copy_string_rep_of_target_data: binder.required("LLVMCopyStringRepOfTargetData")?,
            dispose_message: binder.required("LLVMDisposeMessage")?,
            byte_order: binder.required("LLVMByteOrder")?,
            pointer_size: binder.required("LLVMPointerSize")?,
            pointer_size_for_as: binder.gated(
                "LLVMPointerSizeForAS",
                VersionRange::at_least(POINTER_SIZE_FOR_AS_MIN),
            )?,
            size_of_type_in_bits: binder.required("LLVMSizeOfTypeInBits")?,
            store_size_of_type: binder.required("LLVMStoreSizeOfType")?,
            abi_size_of_type: binder.required("LLVMABISizeOfType")?,
            abi_alignment_of_type: binder.required("LLVMABIAlignmentOfType")?,
            call_frame_alignment_of_type: binder.required("LLVMCallFrameAlignmentOfType")?,
            preferred_alignment_of_type: binder.required("LLVMPreferredAlignmentOfType")?,
            preferred_alignment_of_global: binder.required("LLVMPreferredAlignmentOfGlobal")?,
            element_at_offset: binder.required("LLVMElementAtOffset")?,
            offset_of_element: binder.required("LLVMOffsetOfElement")?,
            context_create: binder.required("LLVMContextCreate")?,
            context_dispose: binder.required("LLVMContextDispose")?,
            int8_type_in_context: binder.required("LLVMInt8TypeInContext")?,
            int64_type_in_context: binder.required("LLVMInt64TypeInContext")?,
            int_type_in_context: binder.required("LLVMIntTypeInContext")?,
            pointer_type: binder.required("LLVMPointerType")?,
            struct_type_in_context: binder.required("LLVMStructTypeInContext")?,
        })
    }
}
