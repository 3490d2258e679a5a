use crate::errors::{Result, StubgenError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SOURCE_EXTENSION: &str = "py";
pub const STUB_EXTENSION: &str = "pyi";

/// Lists the modules of one directory that get a stub. Subdirectories are
/// not entered.
pub struct ModuleWalker {
    root: PathBuf,
    exclude: Vec<String>,
}

impl ModuleWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            exclude: vec![],
        }
    }

    pub fn with_exclude(mut self, stems: Vec<String>) -> Self {
        self.exclude = stems;
        self
    }

    /// Eligible modules in lexicographic file-name order.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                StubgenError::io(path, source)
            })?;
            let path = entry.path();

            if entry.file_type().is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let is_source = path
            .extension()
            .is_some_and(|ext| ext == SOURCE_EXTENSION);
        if !is_source {
            return false;
        }

        match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => !self.exclude.iter().any(|excluded| excluded == stem),
            None => false,
        }
    }
}

pub fn find_modules(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    ModuleWalker::new(root.to_path_buf())
        .with_exclude(exclude.to_vec())
        .walk()
}

/// `dir/X.py` -> `dir/X.pyi`
pub fn stub_path_for(module: &Path) -> PathBuf {
    module.with_extension(STUB_EXTENSION)
}
