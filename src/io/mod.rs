pub mod walker;
pub mod writer;

pub use walker::{find_modules, stub_path_for, ModuleWalker};
pub use writer::{is_up_to_date, write_stub};

use crate::errors::{IoResultExt, Result};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_path(path)
}
