use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure, read from `.ugen-stubs.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StubgenConfig {
    /// Directory holding the modules to stub
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Module stems that are never stubbed
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Skip writing a stub for modules that define no classes
    #[serde(default)]
    pub skip_empty_modules: bool,

    /// Names used by the decorator/field-descriptor convention
    #[serde(default)]
    pub convention: ConventionConfig,

    /// Output formatting
    #[serde(default)]
    pub emit: EmitConfig,
}

impl Default for StubgenConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            exclude: default_exclude(),
            skip_empty_modules: false,
            convention: ConventionConfig::default(),
            emit: EmitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConventionConfig {
    /// Class decorator marking a convention class
    #[serde(default = "default_decorator")]
    pub decorator: String,

    /// Callee of field descriptor assignments
    #[serde(default = "default_field_function")]
    pub field_function: String,

    /// Base class written for synthesized stubs
    #[serde(default = "default_base_class")]
    pub base_class: String,
}

impl Default for ConventionConfig {
    fn default() -> Self {
        Self {
            decorator: default_decorator(),
            field_function: default_field_function(),
            base_class: default_base_class(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmitConfig {
    /// Lines written at the top of every stub, blank entries included
    #[serde(default = "default_header")]
    pub header: Vec<String>,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            header: default_header(),
        }
    }
}

pub fn default_source_dir() -> PathBuf {
    PathBuf::from("supriya").join("ugens")
}

pub fn default_exclude() -> Vec<String> {
    ["__init__", "core", "compilers", "factories"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_decorator() -> String {
    "ugen".to_string()
}

pub fn default_field_function() -> String {
    "param".to_string()
}

pub fn default_base_class() -> String {
    "UGen".to_string()
}

pub fn default_header() -> Vec<String> {
    [
        "from typing import Any",
        "",
        "from supriya.typing import CalculationRateLike",
        "from supriya.ugens.core import UGen, UGenOperable, UGenRecursiveInput, UGenScalar, UGenScalarInput, UGenVector, UGenVectorInput",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
