//! Single-file layout.
//!
//! ```text
//! fn module_util(registry: &Registry) -> Result<Value, Error> { ... }
//! fn module_main(registry: &Registry) -> Result<Value, Error> { ... }
//!
//! pub fn execute() -> Result<Value, Error> {
//!     let registry = Registry::new();
//!     registry.load("main.goblin", || module_main(&registry))
//! }
//!
//! fn main() { ... execute() with the fatal handler ... }
//! ```

use super::{executor, file_header, GeneratedSource, LoweredModule};
use crate::lower::{string_literal, ErrorHandler};

/// Assemble `entry` and its dependencies (in dependency order) into one
/// source file.
pub fn assemble(entry: &LoweredModule, deps: &[LoweredModule]) -> GeneratedSource {
    let mut code = String::with_capacity(
        4096 + entry.body.len() + deps.iter().map(|m| m.body.len()).sum::<usize>(),
    );
    file_header(&mut code, &entry.module.key);

    for module in deps.iter().chain(std::iter::once(entry)) {
        code.push_str(&format!("\n// {}\n", module.module.key));
        executor(
            &mut code,
            "",
            &format!("module_{}", module.module.ident),
            &module.body,
        );
    }

    code.push_str("\n/// Run the program and return the entry module's namespace.\n");
    code.push_str("pub fn execute() -> Result<Value, Error> {\n");
    code.push_str("    let registry = Registry::new();\n");
    code.push_str(&format!(
        "    registry.load({}, || module_{}(&registry))\n",
        string_literal(&entry.module.key),
        entry.module.ident
    ));
    code.push_str("}\n\n");

    code.push_str("fn main() {\n");
    code.push_str(&format!(
        "    {}\n",
        ErrorHandler::Fatal.bind("_", "execute()")
    ));
    code.push_str("}\n");

    GeneratedSource { code }
}
