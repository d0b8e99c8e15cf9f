//! Loading imported modules.
//!
//! The generator never parses source text itself. It asks a
//! [`ModuleLoader`] for the `Program` behind an absolute path, and the
//! loader decides where programs come from: [`FsLoader`] reads files and
//! hands them to a [`SourceParser`], [`MemoryLoader`] serves pre-built trees.

use std::io;
use std::path::{Path, PathBuf};

use goblin_ir::Program;
use rustc_hash::FxHashMap;

/// Why a module could not be loaded.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    /// The parser rejected the source; the message is the parser's.
    Parse(String),
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

/// Source of parsed modules, keyed by absolute path.
pub trait ModuleLoader {
    fn load(&self, path: &Path) -> Result<Program, LoadError>;
}

/// Turns source text into a syntax tree.
pub trait SourceParser {
    /// `name` is the module name, usually the file stem.
    fn parse(&self, name: &str, source: &str) -> Result<Program, String>;
}

/// Reads modules from disk.
pub struct FsLoader<P> {
    parser: P,
}

impl<P: SourceParser> FsLoader<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<P: SourceParser> ModuleLoader for FsLoader<P> {
    fn load(&self, path: &Path) -> Result<Program, LoadError> {
        let source = std::fs::read_to_string(path)?;
        self.parser
            .parse(&module_name(path), &source)
            .map_err(LoadError::Parse)
    }
}

/// Serves programs registered up front. A missing path loads as
/// `NotFound`.
#[derive(Default)]
pub struct MemoryLoader {
    modules: FxHashMap<PathBuf, Program>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, program: Program) {
        self.modules.insert(path.into(), program);
    }

    #[must_use]
    pub fn with(mut self, path: impl Into<PathBuf>, program: Program) -> Self {
        self.insert(path, program);
        self
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<Program, LoadError> {
        self.modules.get(path).cloned().ok_or_else(|| {
            LoadError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no module registered at {}", path.display()),
            ))
        })
    }
}

/// Module name for a path: its file stem.
pub fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
