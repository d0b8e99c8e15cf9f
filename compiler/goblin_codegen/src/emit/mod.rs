//! Assembling lowered modules into output artifacts.
//!
//! Both layouts wrap the same executor bodies. They differ only in where
//! each executor lives and how the entry point reaches it:
//!
//! - [`single_file`]: every module in one source unit;
//! - [`directory`]: a Cargo project with one file per module.

pub mod directory;
pub mod single_file;

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CodegenError;
use crate::resolve::ModuleRef;

/// One module after lowering.
#[derive(Clone, Debug)]
pub struct LoweredModule {
    pub module: ModuleRef,
    /// Namespace name of the module's exports.
    pub name: String,
    /// Executor body, indented one level.
    pub body: String,
}

/// Everything one generator invocation produced.
#[derive(Clone, Debug)]
pub enum GeneratedOutput {
    Source(GeneratedSource),
    Project(GeneratedProject),
}

impl GeneratedOutput {
    pub fn into_source(self) -> Option<GeneratedSource> {
        match self {
            GeneratedOutput::Source(source) => Some(source),
            GeneratedOutput::Project(_) => None,
        }
    }

    pub fn into_project(self) -> Option<GeneratedProject> {
        match self {
            GeneratedOutput::Project(project) => Some(project),
            GeneratedOutput::Source(_) => None,
        }
    }
}

/// A single Rust source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedSource {
    pub code: String,
}

impl GeneratedSource {
    pub fn write_source<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.code.as_bytes())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the project root.
    pub path: PathBuf,
    pub contents: String,
}

/// A Cargo project.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedProject {
    pub files: Vec<GeneratedFile>,
}

impl GeneratedProject {
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
        let path = path.as_ref();
        self.files.iter().find(|file| file.path == path)
    }

    /// Write every file under `dir`, creating directories as needed and
    /// replacing existing files.
    #[tracing::instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
    pub fn write_to(&self, dir: &Path) -> Result<(), CodegenError> {
        for file in &self.files {
            let target = dir.join(&file.path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|err| CodegenError::io(parent, err))?;
            }
            std::fs::write(&target, &file.contents)
                .map_err(|err| CodegenError::io(&target, err))?;
            debug!(path = %file.path.display(), "wrote generated file");
        }
        Ok(())
    }
}

/// Lines every generated source file starts with.
fn file_header(out: &mut String, source: &str) {
    out.push_str(&format!(
        "// Generated from {source} by goblin_codegen. Do not edit.\n"
    ));
    out.push_str("#![allow(unused, clippy::all)]\n\n");
    out.push_str("use goblin_rt::{Binding, Error, KwArgs, Registry, Value};\n");
}

/// `fn <name>(registry: &Registry) -> Result<Value, Error> { <body> }`
fn executor(out: &mut String, visibility: &str, name: &str, body: &str) {
    out.push_str(&format!(
        "{visibility}fn {name}(registry: &Registry) -> Result<Value, Error> {{\n"
    ));
    out.push_str(body);
    out.push_str("}\n");
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
