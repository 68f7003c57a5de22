//! Purpose: Keep the MuPDF runtime in final binaries and report whether it is usable.
//! Exports: `core` (context guard, native allocator, probe, errors), `abi` (C symbols).
//! Role: Library backing the `fitzlink` CLI and the `fitzlink_shim_init` link symbol.
//! Invariants: All MuPDF FFI goes through `core::native`.
//! Invariants: The exported C symbols never unwind into foreign callers.
//! Notes: Link forcing only happens with `--features mupdf`. A default build
//! exports the same symbols but references no MuPDF code, so it keeps nothing
//! in the final binary; `fitzlink_shim_linked` returns 0 there.
pub mod abi;
pub mod core;
