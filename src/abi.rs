//! Purpose: C ABI surface for linking fitzlink into non-Rust programs.
//! Exports: `fitzlink_shim_init`, `fitzlink_shim_linked`.
//! Role: Stable symbols referenced by linkers (`-u fitzlink_shim_init`) and bindings.
//! Invariants: No exported function unwinds; panics are caught and dropped.
//! Invariants: `fitzlink_shim_init` returns nothing and reports nothing.
use std::panic::{self, AssertUnwindSafe};

use crate::core::context::ContextAllocator;
use crate::core::link;
use crate::core::native::NativeAllocator;

/// Creates and drops a MuPDF context so the library cannot be stripped.
#[unsafe(no_mangle)]
pub extern "C" fn fitzlink_shim_init() {
    init_with(&NativeAllocator::new());
}

/// 1 when this build links MuPDF, 0 for a stub build.
#[unsafe(no_mangle)]
pub extern "C" fn fitzlink_shim_linked() -> i32 {
    i32::from(NativeAllocator::is_linked())
}

pub(crate) fn init_with<A: ContextAllocator + ?Sized>(alloc: &A) {
    let _ = panic::catch_unwind(AssertUnwindSafe(|| link::touch(alloc)));
}
