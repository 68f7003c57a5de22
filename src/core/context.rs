//! Purpose: Own a MuPDF context for a bounded scope and release it exactly once.
//! Exports: `RawContext`, `ContextAllocator`, `ContextOptions`, `Context`.
//! Role: RAII boundary between safe code and the context create/drop entry points.
//! Invariants: Every successful `acquire` is paired with exactly one `release`, in `Drop`.
//! Invariants: A null handle is never wrapped and never released.
//! Invariants: `Context` is neither `Send` nor `Sync`; no lock provider is installed.
use std::ptr::NonNull;

use crate::core::error::{Error, ErrorKind};
use crate::core::store::StoreBudget;

/// Opaque stand-in for `fz_context`.
#[repr(C)]
pub struct RawContext {
    _private: [u8; 0],
}

/// Creates and frees library contexts. The custom allocator and lock
/// provider slots are always left unset.
pub trait ContextAllocator {
    fn acquire(&self, budget: StoreBudget) -> Option<NonNull<RawContext>>;

    /// # Safety
    /// `ctx` must have been returned by `acquire` on this allocator and
    /// must not have been released already.
    unsafe fn release(&self, ctx: NonNull<RawContext>);

    /// Whether handles come from a real MuPDF build.
    fn linked(&self) -> bool {
        false
    }

    fn library_version(&self) -> Option<&'static str> {
        None
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ContextOptions {
    budget: StoreBudget,
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(mut self, budget: StoreBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> StoreBudget {
        self.budget
    }
}

pub struct Context<'a, A: ContextAllocator + ?Sized> {
    alloc: &'a A,
    raw: NonNull<RawContext>,
    budget: StoreBudget,
}

impl<'a, A: ContextAllocator + ?Sized> Context<'a, A> {
    pub fn acquire(alloc: &'a A, options: ContextOptions) -> Result<Self, Error> {
        let budget = options.budget();
        let raw = alloc.acquire(budget).ok_or_else(|| {
            Error::new(ErrorKind::Alloc)
                .with_message(format!("failed to create context (store budget: {budget})"))
        })?;
        Ok(Self {
            alloc,
            raw,
            budget,
        })
    }

    pub fn as_ptr(&self) -> *mut RawContext {
        self.raw.as_ptr()
    }

    pub fn budget(&self) -> StoreBudget {
        self.budget
    }
}

impl<A: ContextAllocator + ?Sized> Drop for Context<'_, A> {
    fn drop(&mut self) {
        unsafe {
            self.alloc.release(self.raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, ContextAllocator, ContextOptions, RawContext};
    use crate::core::error::ErrorKind;
    use crate::core::store::StoreBudget;
    use std::cell::{Cell, RefCell};
    use std::ptr::NonNull;

    #[derive(Default)]
    struct Recording {
        fail: bool,
        budgets: RefCell<Vec<usize>>,
        released: Cell<usize>,
    }

    impl ContextAllocator for Recording {
        fn acquire(&self, budget: StoreBudget) -> Option<NonNull<RawContext>> {
            self.budgets.borrow_mut().push(budget.as_raw());
            if self.fail {
                None
            } else {
                Some(NonNull::dangling())
            }
        }

        unsafe fn release(&self, _ctx: NonNull<RawContext>) {
            self.released.set(self.released.get() + 1);
        }
    }

    #[test]
    fn drop_releases_once() {
        let alloc = Recording::default();
        {
            let ctx = Context::acquire(&alloc, ContextOptions::new()).expect("acquire");
            assert!(!ctx.as_ptr().is_null());
            assert_eq!(ctx.budget(), StoreBudget::Unlimited);
            assert_eq!(alloc.released.get(), 0);
        }
        assert_eq!(alloc.released.get(), 1);
        assert_eq!(*alloc.budgets.borrow(), vec![0]);
    }

    #[test]
    fn failed_acquire_is_alloc_error_and_never_releases() {
        let alloc = Recording {
            fail: true,
            ..Recording::default()
        };
        let options = ContextOptions::new().with_budget(StoreBudget::Default);
        let err = Context::acquire(&alloc, options)
            .err()
            .expect("acquire should fail");
        assert_eq!(err.kind(), ErrorKind::Alloc);
        assert!(err.message().unwrap_or("").contains("default"));
        assert_eq!(alloc.released.get(), 0);
    }

    #[test]
    fn works_through_trait_objects() {
        let alloc = Recording::default();
        let dyn_alloc: &dyn ContextAllocator = &alloc;
        drop(Context::acquire(dyn_alloc, ContextOptions::new()).expect("acquire"));
        assert_eq!(alloc.released.get(), 1);
    }
}
