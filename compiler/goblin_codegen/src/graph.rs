//! The module graph walk.
//!
//! Starting from the entry module, each path import is resolved, loaded
//! and lowered depth-first before the importing module's own body. A
//! module reached twice is lowered once and reused; a module reached while
//! it is still on the active import chain is a cycle and aborts the whole
//! invocation.

use std::path::{Path, PathBuf};

use goblin_ir::{Program, Statement};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::context::CodegenContext;
use crate::emit::LoweredModule;
use crate::error::CodegenError;
use crate::loader::{module_name, LoadError, ModuleLoader};
use crate::lower::lower_module_body;
use crate::resolve::{is_path_import, resolve_import, ModuleRef};
use crate::stack::ensure_sufficient_stack;

/// Lower `program` (at absolute path `path`) and everything it imports.
///
/// Returns the lowered entry module. Imported modules are appended to `deps`
/// in dependency order.
pub fn lower_graph(
    ctx: &mut CodegenContext,
    loader: &dyn ModuleLoader,
    program: &Program,
    path: PathBuf,
    deps: &mut Vec<LoweredModule>,
) -> Result<LoweredModule, CodegenError> {
    ctx.loading.start_loading(path.clone())?;
    lower_module(ctx, loader, program, path, deps)
}

/// Lower one module whose path is already on the active chain.
fn lower_module(
    ctx: &mut CodegenContext,
    loader: &dyn ModuleLoader,
    program: &Program,
    path: PathBuf,
    deps: &mut Vec<LoweredModule>,
) -> Result<LoweredModule, CodegenError> {
    ensure_sufficient_stack(|| {
        let key = ctx.loading.key(&path);
        let dir = path.parent().unwrap_or(Path::new("/")).to_path_buf();

        let mut imports: FxHashMap<String, ModuleRef> = FxHashMap::default();
        for stmt in &program.statements {
            let Statement::Import { path: spelling, .. } = stmt else {
                continue;
            };
            if !is_path_import(spelling) || imports.contains_key(spelling) {
                continue;
            }
            debug!(module = %key, import = %spelling, "resolving import");
            let target =
                resolve_import(spelling, &dir).map_err(|err| CodegenError::io(&dir, err))?;
            let module = import_module(ctx, loader, target, deps)?;
            imports.insert(spelling.clone(), module);
        }

        let module = ctx.loading.module_ref(&path);
        let name = if program.name.is_empty() {
            module_name(&path)
        } else {
            program.name.clone()
        };
        ctx.begin_module(key, imports);
        let body = lower_module_body(ctx, program, &name)?;
        ctx.loading.finish_loading(path, module.clone());

        Ok(LoweredModule { module, name, body })
    })
}

fn import_module(
    ctx: &mut CodegenContext,
    loader: &dyn ModuleLoader,
    target: PathBuf,
    deps: &mut Vec<LoweredModule>,
) -> Result<ModuleRef, CodegenError> {
    if let Some(module) = ctx.loading.loaded(&target) {
        debug!(module = %module.key, "reusing lowered module");
        return Ok(module.clone());
    }
    ctx.loading.start_loading(target.clone())?;
    let program = load(loader, &target)?;
    let lowered = lower_module(ctx, loader, &program, target, deps)?;
    let module = lowered.module.clone();
    deps.push(lowered);
    Ok(module)
}

/// Load through `loader`, attaching the path to any failure.
pub fn load(loader: &dyn ModuleLoader, path: &Path) -> Result<Program, CodegenError> {
    loader.load(path).map_err(|err| match err {
        LoadError::Io(source) => CodegenError::io(path, source),
        LoadError::Parse(message) => CodegenError::Parse {
            path: path.to_path_buf(),
            message,
        },
    })
}
