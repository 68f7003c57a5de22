// Raw FFI bindings to the MuPDF context shim in `c/fitzlink_shim.c`.
use std::os::raw::c_char;

use crate::core::context::RawContext;

unsafe extern "C" {
    pub fn fitzlink_new_context(max_store: usize) -> *mut RawContext;

    pub fn fitzlink_drop_context(ctx: *mut RawContext);

    pub fn fitzlink_mupdf_version() -> *const c_char;
}
