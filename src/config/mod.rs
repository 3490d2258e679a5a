//! Configuration for stub generation.
//!
//! Everything has a default, so a missing `.ugen-stubs.toml` is fine.

mod core;
mod loader;

pub use self::core::{ConventionConfig, EmitConfig, StubgenConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_file, parse_config,
    LoadedConfig, CONFIG_FILE_NAME,
};
