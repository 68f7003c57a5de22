//! Purpose: Diagnostic acquire/release cycles that report whether MuPDF is usable.
//! Exports: `ProbeOptions`, `ProbeReport`, `run`.
//! Role: Error-propagating counterpart to `link::touch`, used by the CLI.
//! Invariants: `acquired == released` in every returned report.
//! Invariants: At least one cycle runs, even when `repeat` is zero.
use serde::Serialize;
use tracing::{debug, info};

use crate::core::context::{Context, ContextAllocator, ContextOptions};
use crate::core::error::{Error, ErrorKind};
use crate::core::store::StoreBudget;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProbeOptions {
    pub budget: StoreBudget,
    pub repeat: u32,
    /// Fail unless at least one cycle acquired a context.
    pub require: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            budget: StoreBudget::Unlimited,
            repeat: 1,
            require: false,
        }
    }
}

/// `linked` and `mupdf_version` describe the allocator the probe ran against.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ProbeReport {
    pub linked: bool,
    pub mupdf_version: Option<String>,
    pub budget: String,
    pub attempts: u32,
    pub acquired: u32,
    pub released: u32,
}

pub fn run<A: ContextAllocator + ?Sized>(
    alloc: &A,
    options: &ProbeOptions,
) -> Result<ProbeReport, Error> {
    let attempts = options.repeat.max(1);
    let context_options = ContextOptions::new().with_budget(options.budget);
    let mut acquired = 0;
    let mut released = 0;

    for attempt in 1..=attempts {
        match Context::acquire(alloc, context_options) {
            Ok(ctx) => {
                acquired += 1;
                debug!(attempt, budget = %ctx.budget(), "context acquired");
                drop(ctx);
                released += 1;
            }
            Err(err) => {
                debug!(attempt, error = %err, "context unavailable");
            }
        }
    }

    let report = ProbeReport {
        linked: alloc.linked(),
        mupdf_version: alloc.library_version().map(str::to_string),
        budget: options.budget.to_string(),
        attempts,
        acquired,
        released,
    };
    info!(
        linked = report.linked,
        attempts = report.attempts,
        acquired = report.acquired,
        "probe finished"
    );

    if options.require && report.acquired == 0 {
        return Err(require_error(report.linked));
    }
    Ok(report)
}

fn require_error(linked: bool) -> Error {
    if linked {
        Error::new(ErrorKind::Alloc)
            .with_message("MuPDF is linked but no context could be created")
            .with_hint("Check available memory and the requested store budget.")
    } else {
        Error::new(ErrorKind::Unavailable)
            .with_message("this build does not include MuPDF")
            .with_hint("Rebuild with `--features mupdf` and set `MUPDF_DIR` to the MuPDF install prefix.")
    }
}
