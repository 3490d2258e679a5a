use std::fs;
use std::path::{Path, PathBuf};

use super::core::StubgenConfig;
use crate::errors::{Result, StubgenError};

pub const CONFIG_FILE_NAME: &str = ".ugen-stubs.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// A configuration together with the directory relative paths resolve against.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: StubgenConfig,
    pub base_dir: PathBuf,
    /// The file it came from, if any
    pub origin: Option<PathBuf>,
}

impl LoadedConfig {
    /// The source directory, resolved against the config location.
    pub fn source_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.source_dir)
    }
}

/// Pure function to parse config from TOML string
pub fn parse_config(contents: &str) -> std::result::Result<StubgenConfig, String> {
    toml::from_str::<StubgenConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// Load an explicitly requested config file. Any failure is fatal.
pub fn load_config_file(path: &Path) -> Result<LoadedConfig> {
    let contents =
        fs::read_to_string(path).map_err(|e| StubgenError::config(path, e.to_string()))?;
    let config = parse_config(&contents).map_err(|message| StubgenError::config(path, message))?;
    tracing::debug!("Loaded config from {}", path.display());

    Ok(LoadedConfig {
        config,
        base_dir: parent_dir(path),
        origin: Some(path.to_path_buf()),
    })
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<LoadedConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(LoadedConfig {
                config,
                base_dir: parent_dir(config_path),
                origin: Some(config_path.to_path_buf()),
            })
        }
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file, falling back to
/// defaults rooted at `start`.
pub fn discover_config(start: &Path) -> LoadedConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            LoadedConfig {
                config: StubgenConfig::default(),
                base_dir: start.to_path_buf(),
                origin: None,
            }
        })
}

/// Resolve the configuration for a run: the explicit file when given,
/// otherwise discovery from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    let current = std::env::current_dir().unwrap_or_else(|e| {
        tracing::warn!("Failed to get current directory: {}. Using \".\".", e);
        PathBuf::from(".")
    });
    Ok(discover_config(&current))
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
