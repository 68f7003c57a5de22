//! Purpose: Context allocator backed by the native MuPDF libraries.
//! Exports: `NativeAllocator`.
//! Role: The only `ContextAllocator` that reaches real MuPDF code.
//! Invariants: All FFI interaction is confined to this module + `sys`.
//! Invariants: Without the `mupdf` feature every acquisition yields no handle.
use std::ptr::NonNull;

use crate::core::context::{ContextAllocator, RawContext};
use crate::core::store::StoreBudget;

#[cfg(feature = "mupdf")]
pub mod sys;

#[derive(Clone, Copy, Debug, Default)]
pub struct NativeAllocator;

impl NativeAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Whether this build carries the MuPDF libraries at all.
    pub const fn is_linked() -> bool {
        cfg!(feature = "mupdf")
    }

    /// MuPDF version the shim was compiled against.
    #[cfg(feature = "mupdf")]
    pub fn version() -> Option<&'static str> {
        let ptr = unsafe { sys::fitzlink_mupdf_version() };
        if ptr.is_null() {
            return None;
        }
        // FZ_VERSION is a string literal with static storage.
        let version = unsafe { std::ffi::CStr::from_ptr(ptr) };
        version.to_str().ok()
    }

    #[cfg(not(feature = "mupdf"))]
    pub fn version() -> Option<&'static str> {
        None
    }
}

#[cfg(feature = "mupdf")]
impl ContextAllocator for NativeAllocator {
    fn acquire(&self, budget: StoreBudget) -> Option<NonNull<RawContext>> {
        NonNull::new(unsafe { sys::fitzlink_new_context(budget.as_raw()) })
    }

    unsafe fn release(&self, ctx: NonNull<RawContext>) {
        unsafe { sys::fitzlink_drop_context(ctx.as_ptr()) }
    }

    fn linked(&self) -> bool {
        NativeAllocator::is_linked()
    }

    fn library_version(&self) -> Option<&'static str> {
        NativeAllocator::version()
    }
}

#[cfg(not(feature = "mupdf"))]
impl ContextAllocator for NativeAllocator {
    fn acquire(&self, _budget: StoreBudget) -> Option<NonNull<RawContext>> {
        None
    }

    unsafe fn release(&self, _ctx: NonNull<RawContext>) {}

    fn linked(&self) -> bool {
        NativeAllocator::is_linked()
    }

    fn library_version(&self) -> Option<&'static str> {
        NativeAllocator::version()
    }
}
