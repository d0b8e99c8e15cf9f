//! Code generation context and state.
//!
//! One `CodegenContext` lives for exactly one generator invocation. It owns
//! the output buffer, the temp counter, the lexical scope stack used to
//! compute closure captures, and the import loading state. Nothing here is
//! global, so concurrent invocations never share temp names or caches.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::lower::ErrorHandler;
use crate::options::OutputLayout;
use crate::resolve::{LoadingContext, ModuleRef};

/// What kind of body is being lowered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// A module executor.
    Module,
    /// A function closure.
    Function,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    handler: ErrorHandler,
    loop_depth: usize,
}

pub struct CodegenContext {
    layout: OutputLayout,
    /// Registry key of the module being lowered.
    module: String,
    /// Path imports of the module being lowered, by import spelling.
    imports: FxHashMap<String, ModuleRef>,
    pub(crate) loading: LoadingContext,
    /// Goblin names declared in each open block, innermost last.
    scopes: Vec<Vec<String>>,
    frames: Vec<Frame>,
    indent: usize,
    output: String,
    temp_counter: u32,
}

impl CodegenContext {
    /// `root` is the entry module's directory.
    pub fn new(layout: OutputLayout, root: PathBuf) -> Self {
        Self {
            layout,
            module: String::new(),
            imports: FxHashMap::default(),
            loading: LoadingContext::new(root),
            scopes: Vec::new(),
            frames: Vec::new(),
            indent: 0,
            output: String::with_capacity(4096),
            temp_counter: 0,
        }
    }

    pub fn layout(&self) -> OutputLayout {
        self.layout
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Start lowering the body of `module`, whose path imports resolved to
    /// `imports`.
    pub fn begin_module(&mut self, module: String, imports: FxHashMap<String, ModuleRef>) {
        debug_assert!(self.scopes.is_empty(), "module lowered inside another body");
        self.module = module;
        self.imports = imports;
    }

    pub fn import(&self, spelling: &str) -> Option<&ModuleRef> {
        self.imports.get(spelling)
    }

    /// Rust path of the function executing `module`.
    pub fn executor_path(&self, module: &ModuleRef) -> String {
        match self.layout {
            OutputLayout::SingleFile => format!("module_{}", module.ident),
            OutputLayout::Directory => format!("crate::module_{}::execute", module.ident),
        }
    }

    /// Mangle a Goblin name into a Rust local.
    ///
    /// The prefix keeps Goblin names clear of Rust keywords and of the
    /// generator's own `_tN` temps.
    pub fn mangle(name: &str) -> String {
        let mut result = String::with_capacity(name.len() + 4);
        result.push_str("gob_");
        for c in name.chars() {
            if c.is_ascii_alphanumeric() || c == '_' {
                result.push(c);
            } else {
                result.push('_');
            }
        }
        result
    }

    /// Generate a unique temporary variable name.
    pub fn fresh_temp(&mut self) -> String {
        let n = self.temp_counter;
        self.temp_counter += 1;
        format!("_t{n}")
    }

    // Scopes

    pub fn push_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            if !scope.iter().any(|n| n == name) {
                scope.push(name.to_string());
            }
        }
    }

    /// Number of open blocks. The module body is depth 1.
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.iter().any(|n| n == name))
    }

    /// Every visible name, once each, outermost first.
    pub fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.scopes.iter().flatten() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    // Frames

    pub fn enter_frame(&mut self, kind: FrameKind, handler: ErrorHandler) {
        self.frames.push(Frame {
            kind,
            handler,
            loop_depth: 0,
        });
    }

    pub fn exit_frame(&mut self) {
        self.frames.pop();
    }

    /// Error handler of the innermost body.
    pub fn handler(&self) -> ErrorHandler {
        self.frames
            .last()
            .map_or(ErrorHandler::Propagate, |frame| frame.handler)
    }

    pub fn in_function(&self) -> bool {
        self.frames
            .last()
            .is_some_and(|frame| frame.kind == FrameKind::Function)
    }

    pub fn in_loop(&self) -> bool {
        self.frames.last().is_some_and(|frame| frame.loop_depth > 0)
    }

    pub fn enter_loop(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.loop_depth += 1;
        }
    }

    pub fn exit_loop(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.loop_depth = frame.loop_depth.saturating_sub(1);
        }
    }

    // Output

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    /// Write a line at the current indentation.
    pub fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
