// Export modules for library usage
pub mod cli;
pub mod config;
pub mod core;
pub mod emitter;
pub mod errors;
pub mod extraction;
pub mod generator;
pub mod io;
pub mod observability;
pub mod parser;
pub mod synthesis;

// Re-export commonly used types
pub use crate::config::{load_config, LoadedConfig, StubgenConfig};
pub use crate::core::{
    ClassStub, DecoratorMetadata, FieldDescriptor, MemberStub, ParamKind, ParameterStub, RateTag,
    Signature, StubOrigin,
};
pub use crate::emitter::render_module;
pub use crate::errors::{Ambiguity, Result, StubgenError};
pub use crate::extraction::{classify, ClassShape};
pub use crate::generator::{
    generate_module, run, ModuleOutcome, RenderedModule, RunOptions, RunReport,
};
pub use crate::parser::parse_module;
pub use crate::synthesis::synthesize;
