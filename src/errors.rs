//! Error types for stub generation.
//!
//! Fatal failures are [`StubgenError`]s and abort the run. Problems local to
//! one class (a non-literal decorator keyword, an unexpected assignment
//! target) are [`Ambiguity`] values: they are logged and counted, and the
//! affected piece falls back to its default.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StubgenError {
    /// Module text is not valid Python
    #[error("Parse error in {}:{line}:{column}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Reading a module or writing a stub failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// The tree-sitter grammar could not be loaded
    #[error("Parser setup failed: {0}")]
    ParserSetup(String),
}

impl StubgenError {
    pub fn parse(
        path: impl Into<PathBuf>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The file the error is about, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Parse { path, .. } | Self::Io { path, .. } | Self::Config { path, .. } => {
                Some(path)
            }
            Self::ParserSetup(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StubgenError>;

/// Extension trait attaching a path to raw I/O results.
pub trait IoResultExt<T> {
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|source| StubgenError::io(path, source))
    }
}

/// A recoverable extraction problem inside one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ambiguity {
    /// A recognized `@ugen` keyword whose value is not a literal
    NonLiteralDecoratorKeyword { class: String, keyword: String },
    /// `param(..., unexpanded=<expr>)` with a non-literal value
    NonLiteralFieldFlag { class: String, field: String },
    /// `param()` assigned to something other than a plain name
    UnsupportedFieldTarget { class: String, target: String },
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonLiteralDecoratorKeyword { class, keyword } => write!(
                f,
                "{}: decorator keyword `{}` is not a literal; using default",
                class, keyword
            ),
            Self::NonLiteralFieldFlag { class, field } => write!(
                f,
                "{}.{}: `unexpanded` is not a literal; treating as False",
                class, field
            ),
            Self::UnsupportedFieldTarget { class, target } => write!(
                f,
                "{}: field descriptor assigned to `{}`; ignored",
                class, target
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_includes_location() {
        let err = StubgenError::parse("ugens/osc.py", 3, 7, "unexpected token");
        assert_eq!(
            err.to_string(),
            "Parse error in ugens/osc.py:3:7: unexpected token"
        );
        assert_eq!(err.path(), Some(Path::new("ugens/osc.py")));
    }

    #[test]
    fn test_io_result_ext_attaches_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.with_path(Path::new("out.pyi")).unwrap_err();
        assert!(matches!(err, StubgenError::Io { .. }));
        assert!(err.to_string().contains("out.pyi"));
    }

    #[test]
    fn test_ambiguity_display() {
        let note = Ambiguity::NonLiteralDecoratorKeyword {
            class: "SinOsc".into(),
            keyword: "ar".into(),
        };
        assert_eq!(
            note.to_string(),
            "SinOsc: decorator keyword `ar` is not a literal; using default"
        );
    }
}
