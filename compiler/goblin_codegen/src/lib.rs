//! Rust code generation for Goblin programs.
//!
//! Lowers a Goblin [`Program`] and every module it imports into Rust source
//! that links against `goblin_rt`.
//!
//! # Architecture
//!
//! ```text
//! entry Program + ModuleLoader
//!        ↓
//!   module graph walk   (resolve imports, detect cycles, load depth-first)
//!        ↓
//!   lowering            (one executor body per module)
//!        ↓
//!   layout assembly     (single file, or a Cargo project)
//! ```
//!
//! Every invocation gets a fresh [`CodegenContext`], so output is
//! deterministic and invocations share no state.
//!
//! # Example
//!
//! ```text
//! let loader = FsLoader::new(MyParser);
//! let options = CodegenOptions::new().with_layout(OutputLayout::Directory);
//! let output = Generator::new(&loader, options).generate_path(Path::new("main.goblin"))?;
//! ```

mod context;
pub mod emit;
mod error;
mod graph;
pub mod loader;
pub mod lower;
pub mod options;
pub mod resolve;
mod stack;

use std::path::Path;
use std::sync::Once;

use goblin_ir::Program;

pub use context::{CodegenContext, FrameKind};
pub use emit::{GeneratedFile, GeneratedOutput, GeneratedProject, GeneratedSource};
pub use error::CodegenError;
pub use loader::{FsLoader, LoadError, MemoryLoader, ModuleLoader, SourceParser};
pub use options::{CodegenOptions, OutputLayout, RuntimeDependency};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber driven by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only the first call has any
/// effect.
///
/// ```bash
/// RUST_LOG=goblin_codegen=debug goblin build main.goblin
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Generates code for one entry module and its imports.
pub struct Generator<'a> {
    loader: &'a dyn ModuleLoader,
    options: CodegenOptions,
}

impl<'a> Generator<'a> {
    pub fn new(loader: &'a dyn ModuleLoader, options: CodegenOptions) -> Self {
        Self { loader, options }
    }

    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    /// Load the entry module through the loader, then generate.
    pub fn generate_path(&self, entry: &Path) -> Result<GeneratedOutput, CodegenError> {
        let path = resolve::absolute(entry).map_err(|err| CodegenError::io(entry, err))?;
        let program = graph::load(self.loader, &path)?;
        self.generate(&program, &path)
    }

    /// Generate code for `program`, located at `entry`.
    ///
    /// `entry` decides where relative imports resolve from and how modules
    /// are keyed; the file itself is never read.
    #[tracing::instrument(level = "debug", skip_all, fields(entry = %entry.display()))]
    pub fn generate(
        &self,
        program: &Program,
        entry: &Path,
    ) -> Result<GeneratedOutput, CodegenError> {
        let entry = resolve::absolute(entry).map_err(|err| CodegenError::io(entry, err))?;
        let root = entry.parent().unwrap_or(Path::new("/")).to_path_buf();

        let mut ctx = CodegenContext::new(self.options.layout, root);
        let mut deps = Vec::new();
        let entry_module =
            graph::lower_graph(&mut ctx, self.loader, program, entry.clone(), &mut deps)?;
        tracing::debug!(
            modules = deps.len() + 1,
            layout = ?self.options.layout,
            "assembling output"
        );

        Ok(match self.options.layout {
            OutputLayout::SingleFile => {
                GeneratedOutput::Source(emit::single_file::assemble(&entry_module, &deps))
            }
            OutputLayout::Directory => {
                let package = self
                    .options
                    .package_name
                    .clone()
                    .unwrap_or_else(|| emit::directory::package_name(&loader::module_name(&entry)));
                GeneratedOutput::Project(emit::directory::assemble(
                    &package,
                    &self.options.runtime,
                    &entry_module,
                    &deps,
                )?)
            }
        })
    }
}

/// Generate code for `program` at `entry` with a one-off [`Generator`].
pub fn generate(
    program: &Program,
    entry: &Path,
    loader: &dyn ModuleLoader,
    options: CodegenOptions,
) -> Result<GeneratedOutput, CodegenError> {
    Generator::new(loader, options).generate(program, entry)
}
