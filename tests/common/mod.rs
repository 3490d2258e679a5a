// Test utility module for ugen-stubgen integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: &str = "\
from typing import Any

from supriya.typing import CalculationRateLike
from supriya.ugens.core import UGen, UGenOperable, UGenRecursiveInput, UGenScalar, UGenScalarInput, UGenVector, UGenVectorInput
";

/// A temporary UGen package directory.
pub struct UgenPackage {
    pub temp_dir: TempDir,
}

impl UgenPackage {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn with_module(self, stem: &str, source: &str) -> Self {
        fs::write(self.module_path(stem), source).expect("Failed to write module");
        self
    }

    pub fn module_path(&self, stem: &str) -> PathBuf {
        self.path().join(format!("{stem}.py"))
    }

    pub fn stub_path(&self, stem: &str) -> PathBuf {
        self.path().join(format!("{stem}.pyi"))
    }

    pub fn read_stub(&self, stem: &str) -> String {
        fs::read_to_string(self.stub_path(stem)).expect("Failed to read stub")
    }
}

/// Header followed by the expected class blocks.
pub fn with_header(body: &str) -> String {
    format!("{HEADER}\n{body}")
}
