//! Compile-time generator errors.
//!
//! Every variant aborts the invocation that raised it. Nothing is retried and
//! no partial output is returned.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error raised while generating code for a module graph.
///
/// `module` fields hold the registry key of the module being lowered
/// (its path relative to the entry module's directory).
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("{module}: {construct} is not supported")]
    NotImplemented {
        module: String,
        construct: &'static str,
    },

    #[error("{module}: unknown import '{name}'")]
    UnknownImport { module: String, name: String },

    #[error("circular import detected: {}", cycle.join(" -> "))]
    CircularImport { cycle: Vec<String> },

    #[error("{module}: '{statement}' is only valid {allowed}")]
    Misplaced {
        module: String,
        statement: &'static str,
        allowed: &'static str,
    },

    #[error("{module}: undefined name '{name}'")]
    UndefinedName { module: String, name: String },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to write Cargo.toml: {0}")]
    Manifest(#[from] toml::ser::Error),
}

impl CodegenError {
    #[cold]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CodegenError::Io {
            path: path.into(),
            source,
        }
    }
}
