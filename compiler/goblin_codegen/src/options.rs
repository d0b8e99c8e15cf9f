//! Generator configuration.

use std::path::PathBuf;

/// Environment variable naming a local checkout of `goblin_rt`.
pub const RUNTIME_PATH_ENV: &str = "GOBLIN_RT_PATH";

/// How generated modules are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputLayout {
    /// One Rust source file holding every module.
    #[default]
    SingleFile,
    /// A Cargo project with one source file per module.
    Directory,
}

/// The `goblin_rt` dependency written into a generated project's manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeDependency {
    pub version: String,
    /// Build against a local checkout instead of the registry.
    pub path_override: Option<PathBuf>,
}

impl Default for RuntimeDependency {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            path_override: None,
        }
    }
}

impl RuntimeDependency {
    /// Default version, with the path override taken from `GOBLIN_RT_PATH`
    /// when it is set and non-empty.
    pub fn from_env() -> Self {
        let path_override = std::env::var_os(RUNTIME_PATH_ENV)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        Self {
            path_override,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodegenOptions {
    pub layout: OutputLayout,
    /// Package name for directory output. Defaults to the entry file stem.
    pub package_name: Option<String>,
    pub runtime: RuntimeDependency,
}

impl CodegenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_runtime(mut self, runtime: RuntimeDependency) -> Self {
        self.runtime = runtime;
        self
    }
}
