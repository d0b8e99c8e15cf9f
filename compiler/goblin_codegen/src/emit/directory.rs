//! Directory layout: a standalone Cargo project.
//!
//! ```text
//! Cargo.toml
//! src/main.rs                 entry executor, registry, fatal handler
//! src/modules/util.rs         pub fn execute(registry: &Registry) -> ...
//! src/modules/_parent/x.rs    for an import of ../x
//! ```
//!
//! `main.rs` declares every module with `#[path]`, so the module tree stays
//! flat however deep the import paths go.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{executor, file_header, GeneratedFile, GeneratedProject, LoweredModule};
use crate::error::CodegenError;
use crate::lower::{string_literal, ErrorHandler};
use crate::options::RuntimeDependency;

/// Assemble a Cargo project named `package` running `entry`.
pub fn assemble(
    package: &str,
    runtime: &RuntimeDependency,
    entry: &LoweredModule,
    deps: &[LoweredModule],
) -> Result<GeneratedProject, CodegenError> {
    let mut files = Vec::with_capacity(deps.len() + 2);
    files.push(GeneratedFile {
        path: PathBuf::from("Cargo.toml"),
        contents: manifest(package, runtime)?,
    });
    files.push(GeneratedFile {
        path: PathBuf::from("src/main.rs"),
        contents: main_file(entry, deps),
    });
    for module in deps {
        files.push(GeneratedFile {
            path: PathBuf::from("src").join(module_file(module)),
            contents: module_source(module),
        });
    }
    Ok(GeneratedProject { files })
}

/// Path of a module's source relative to `src/`.
fn module_file(module: &LoweredModule) -> String {
    format!("modules/{}.rs", module.module.stem)
}

fn main_file(entry: &LoweredModule, deps: &[LoweredModule]) -> String {
    let mut code = String::with_capacity(4096 + entry.body.len());
    file_header(&mut code, &entry.module.key);

    if !deps.is_empty() {
        code.push('\n');
    }
    for module in deps {
        code.push_str(&format!(
            "#[path = {}]\nmod module_{};\n",
            string_literal(&module_file(module)),
            module.module.ident
        ));
    }

    code.push('\n');
    executor(&mut code, "", "execute", &entry.body);

    code.push_str("\nfn main() {\n");
    code.push_str("    let registry = Registry::new();\n");
    let call = format!(
        "registry.load({}, || execute(&registry))",
        string_literal(&entry.module.key)
    );
    code.push_str(&format!("    {}\n", ErrorHandler::Fatal.bind("_", &call)));
    code.push_str("}\n");
    code
}

fn module_source(module: &LoweredModule) -> String {
    let mut code = String::with_capacity(1024 + module.body.len());
    file_header(&mut code, &module.module.key);
    code.push('\n');
    executor(&mut code, "pub ", "execute", &module.body);
    code
}

/// The generated project's `Cargo.toml`.
///
/// The empty `[workspace]` table keeps the project out of any workspace
/// that encloses the output directory.
pub fn manifest(package: &str, runtime: &RuntimeDependency) -> Result<String, toml::ser::Error> {
    let goblin_rt = match &runtime.path_override {
        Some(path) => Dependency::Detailed {
            version: &runtime.version,
            path: path.as_path(),
        },
        None => Dependency::Version(&runtime.version),
    };
    toml::to_string(&Manifest {
        package: Package {
            name: package,
            version: "0.1.0",
            edition: "2021",
            publish: false,
        },
        dependencies: Dependencies { goblin_rt },
        workspace: Workspace {},
    })
}

#[derive(Serialize)]
struct Manifest<'a> {
    package: Package<'a>,
    dependencies: Dependencies<'a>,
    workspace: Workspace,
}

#[derive(Serialize)]
struct Package<'a> {
    name: &'a str,
    version: &'a str,
    edition: &'a str,
    publish: bool,
}

#[derive(Serialize)]
struct Dependencies<'a> {
    goblin_rt: Dependency<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Dependency<'a> {
    Version(&'a str),
    Detailed { version: &'a str, path: &'a Path },
}

#[derive(Serialize)]
struct Workspace {}

/// A valid Cargo package name derived from `stem`.
pub fn package_name(stem: &str) -> String {
    let mut name: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if name.is_empty() {
        name.push_str("goblin-program");
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "goblin-");
    }
    name
}
