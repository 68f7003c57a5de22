//! Purpose: Exercise the MuPDF context lifecycle so the linker keeps MuPDF.
//! Exports: `Touch`, `touch`, `force_link`.
//! Role: Rust side of the `fitzlink_shim_init` link-forcing symbol.
//! Invariants: Never errors and never logs; allocation failure is tolerated.
//! Invariants: A context acquired here is released before returning.
use crate::core::context::{Context, ContextAllocator, ContextOptions};
use crate::core::native::NativeAllocator;
use crate::core::store::StoreBudget;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Touch {
    /// A context was created and dropped.
    Released,
    /// The allocator returned no context; nothing was released.
    Skipped,
}

pub fn touch<A: ContextAllocator + ?Sized>(alloc: &A) -> Touch {
    let options = ContextOptions::new().with_budget(StoreBudget::Unlimited);
    match Context::acquire(alloc, options) {
        Ok(ctx) => {
            drop(ctx);
            Touch::Released
        }
        Err(_) => Touch::Skipped,
    }
}

pub fn force_link() -> Touch {
    touch(&NativeAllocator::new())
}
