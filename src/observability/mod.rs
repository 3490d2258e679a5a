//! Logging setup, crash reports and per-thread run context.
//!
//! - **Logging**: `tracing` subscriber with an `EnvFilter`, installed once
//! - **Panic Hook**: prints the phase and module being processed on a crash
//! - **Context Tracking**: thread-local phase and file, atomic progress counters
//!
//! ```ignore
//! use ugen_stubgen::observability::{set_current_file, set_phase, StubgenPhase};
//!
//! let _phase = set_phase(StubgenPhase::Rendering);
//! for module in modules {
//!     let _file = set_current_file(&module);
//!     render(&module)?;
//! }
//! ```

pub mod context;
pub mod logging;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_file, set_phase,
    set_progress, ContextGuard, RunContext, StubgenPhase,
};
pub use logging::{init_logging, level_for};
pub use panic_hook::install_panic_hook;
