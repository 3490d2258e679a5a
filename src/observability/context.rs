//! Thread-local context tracking for crash reports.
//!
//! Each thread carries its own phase and current module (rendering runs on
//! rayon workers), while progress is global and kept in atomic counters.
//! Guards restore the previous context on drop.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static MODULES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static MODULES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<RunContext> = const { RefCell::new(RunContext::new()) };
}

/// What the generator was doing on this thread.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub phase: Option<StubgenPhase>,
    pub current_file: Option<PathBuf>,
}

impl RunContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
        }
    }
}

/// Stages of a generator run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubgenPhase {
    /// Listing eligible source modules
    Discovery,
    /// Building declaration trees
    Parsing,
    /// Classifying classes and reading metadata
    Extraction,
    /// Turning stubs into `.pyi` text
    Rendering,
    /// Replacing or checking stub files on disk
    Writing,
}

impl std::fmt::Display for StubgenPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovery => write!(f, "discovery"),
            Self::Parsing => write!(f, "parsing"),
            Self::Extraction => write!(f, "extraction"),
            Self::Rendering => write!(f, "rendering"),
            Self::Writing => write!(f, "writing"),
        }
    }
}

/// RAII guard that puts the previous context back when dropped.
pub struct ContextGuard {
    previous: RunContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

#[must_use]
pub fn set_phase(phase: StubgenPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_file = Some(path.into());
        ContextGuard { previous }
    })
}

pub fn set_progress(processed: usize, total: usize) {
    MODULES_PROCESSED.store(processed, Ordering::Relaxed);
    MODULES_TOTAL.store(total, Ordering::Relaxed);
}

/// Safe to call from parallel iterators.
pub fn increment_processed() {
    MODULES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> RunContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total) modules.
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        MODULES_PROCESSED.load(Ordering::Relaxed),
        MODULES_TOTAL.load(Ordering::Relaxed),
    )
}

#[cfg(test)]
fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = RunContext::new();
    });
}
