//! Import resolution and cycle tracking.
//!
//! An import spelling is a path import when it starts with `.` or `/` or
//! contains a `/`; anything else names a native namespace. Path imports
//! resolve against the importing module's directory, gain the `.goblin`
//! extension when it is missing, and are made absolute and lexically
//! normalized so that `./a/../b` and `./b` are the same module.
//!
//! Generated code never sees absolute paths. Modules are keyed by their
//! path relative to the entry module's directory (`util.goblin`,
//! `lib/math.goblin`, `../shared.goblin`).

use std::io;
use std::path::{Component, Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::CodegenError;

/// File extension of Goblin sources.
pub const SOURCE_EXTENSION: &str = "goblin";

/// Whether `spelling` names a file rather than a native namespace.
pub fn is_path_import(spelling: &str) -> bool {
    spelling.starts_with('.') || spelling.starts_with('/') || spelling.contains('/')
}

/// Absolute, normalized path of `spelling` imported from a module in
/// `importer_dir`.
pub fn resolve_import(spelling: &str, importer_dir: &Path) -> io::Result<PathBuf> {
    let mut file = spelling.to_string();
    if Path::new(spelling).extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION) {
        file.push('.');
        file.push_str(SOURCE_EXTENSION);
    }
    absolute(&importer_dir.join(file))
}

/// `path` made absolute against the current directory, then normalized.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    Ok(normalize(&std::path::absolute(path)?))
}

/// Lexical normalization: drops `.` and folds `dir/..`.
///
/// A `..` that would climb above the root is dropped; a leading `..` on a
/// relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                let in_dir = matches!(last, Some(Component::Normal(_)));
                if in_dir {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `path` relative to the directory `base`. Both must be normalized
/// absolute paths.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base_parts.len() {
        out.push("..");
    }
    for part in &path_parts[common..] {
        out.push(part.as_os_str());
    }
    out
}

/// Registry key of the module at `path`: its path relative to `root`,
/// always `/`-separated.
pub fn module_key(path: &Path, root: &Path) -> String {
    relative_to(path, root)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative source path for a module key in directory output, without
/// extension: `..` becomes `_parent`, other characters a Rust module path
/// cannot hold become `_`.
pub fn module_stem(key: &str) -> String {
    let without_ext = key
        .strip_suffix(SOURCE_EXTENSION)
        .and_then(|k| k.strip_suffix('.'))
        .unwrap_or(key);
    without_ext
        .split('/')
        .map(|part| {
            if part == ".." {
                "_parent".to_string()
            } else {
                sanitize(part)
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Flat Rust identifier for a module key.
pub fn module_ident(key: &str) -> String {
    module_stem(key).replace('/', "_")
}

fn sanitize(part: &str) -> String {
    let mut out: String = part
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// A module that has been lowered, as importers refer to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleRef {
    /// Registry key.
    pub key: String,
    /// Unique Rust identifier used for the module's executor.
    pub ident: String,
    /// Unique source path stem for directory output (see [`module_stem`]).
    pub stem: String,
}

/// Import loading state for one generator invocation.
///
/// Tracks the chain of modules currently being lowered (for cycle
/// detection) and every module already lowered (so each is generated
/// once, however many modules import it).
pub struct LoadingContext {
    root: PathBuf,
    loading_stack: Vec<PathBuf>,
    loading_set: FxHashSet<PathBuf>,
    loaded: FxHashMap<PathBuf, ModuleRef>,
    idents: FxHashSet<String>,
    stems: FxHashSet<String>,
}

impl LoadingContext {
    /// `root` is the entry module's directory.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            loading_stack: Vec::new(),
            loading_set: FxHashSet::default(),
            loaded: FxHashMap::default(),
            idents: FxHashSet::default(),
            stems: FxHashSet::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key(&self, path: &Path) -> String {
        module_key(path, &self.root)
    }

    pub fn would_cycle(&self, path: &Path) -> bool {
        self.loading_set.contains(path)
    }

    pub fn loaded(&self, path: &Path) -> Option<&ModuleRef> {
        self.loaded.get(path)
    }

    /// Push `path` onto the active chain, failing if it is already there.
    ///
    /// The reported cycle starts at the earlier occurrence of `path`, so
    /// modules that merely lead into the cycle are left out.
    pub fn start_loading(&mut self, path: PathBuf) -> Result<(), CodegenError> {
        if self.would_cycle(&path) {
            let start = self
                .loading_stack
                .iter()
                .position(|p| *p == path)
                .unwrap_or(0);
            let cycle = self.loading_stack[start..]
                .iter()
                .chain(std::iter::once(&path))
                .map(|p| self.key(p))
                .collect();
            return Err(CodegenError::CircularImport { cycle });
        }
        self.loading_set.insert(path.clone());
        self.loading_stack.push(path);
        Ok(())
    }

    /// Pop the active chain and record the finished module.
    pub fn finish_loading(&mut self, path: PathBuf, module: ModuleRef) {
        if let Some(popped) = self.loading_stack.pop() {
            self.loading_set.remove(&popped);
        }
        self.loaded.insert(path, module);
    }

    /// A module reference for `path` whose identifier and source stem no
    /// other module uses. Distinct keys can sanitize to the same name
    /// (`my-mod` and `my_mod`); later ones get a numeric suffix.
    pub fn module_ref(&mut self, path: &Path) -> ModuleRef {
        let key = self.key(path);
        let base_ident = module_ident(&key);
        let base_stem = module_stem(&key);
        let (mut ident, mut stem) = (base_ident.clone(), base_stem.clone());
        let mut n = 1;
        while self.idents.contains(&ident) || self.stems.contains(&stem) {
            ident = format!("{base_ident}_{n}");
            stem = format!("{base_stem}_{n}");
            n += 1;
        }
        self.idents.insert(ident.clone());
        self.stems.insert(stem.clone());
        ModuleRef { key, ident, stem }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_path_import() {
        assert!(is_path_import("./util"));
        assert!(is_path_import("../shared"));
        assert!(is_path_import("/abs/mod"));
        assert!(is_path_import("lib/math"));
        assert!(!is_path_import("os"));
        assert!(!is_path_import("random"));
    }

    #[test]
    fn test_resolve_appends_extension() {
        let dir = Path::new("/project/src");
        assert_eq!(
            resolve_import("./util", dir).unwrap(),
            PathBuf::from("/project/src/util.goblin")
        );
        assert_eq!(
            resolve_import("./util.goblin", dir).unwrap(),
            PathBuf::from("/project/src/util.goblin")
        );
        assert_eq!(
            resolve_import("../lib/../shared", dir).unwrap(),
            PathBuf::from("/project/shared.goblin")
        );
        assert_eq!(
            resolve_import("/abs/mod", dir).unwrap(),
            PathBuf::from("/abs/mod.goblin")
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../a/..")), PathBuf::from(".."));
    }

    #[test]
    fn test_module_keys() {
        let root = Path::new("/project");
        assert_eq!(module_key(Path::new("/project/util.goblin"), root), "util.goblin");
        assert_eq!(
            module_key(Path::new("/project/lib/math.goblin"), root),
            "lib/math.goblin"
        );
        assert_eq!(module_key(Path::new("/shared.goblin"), root), "../shared.goblin");
    }

    #[test]
    fn test_module_stem_and_ident() {
        assert_eq!(module_stem("lib/math.goblin"), "lib/math");
        assert_eq!(module_stem("../shared.goblin"), "_parent/shared");
        assert_eq!(module_stem("my-mod.goblin"), "my_mod");
        assert_eq!(module_ident("../lib/2d.goblin"), "_parent_lib__2d");
    }

    #[test]
    fn test_loading_context() {
        let mut ctx = LoadingContext::new(PathBuf::from("/p"));
        let a = PathBuf::from("/p/a.goblin");
        let b = PathBuf::from("/p/b.goblin");

        ctx.start_loading(a.clone()).unwrap();
        assert!(ctx.would_cycle(&a));
        assert!(!ctx.would_cycle(&b));

        ctx.start_loading(b.clone()).unwrap();
        let b_ref = ctx.module_ref(&b);
        ctx.finish_loading(b.clone(), b_ref.clone());
        assert!(!ctx.would_cycle(&b));
        assert_eq!(ctx.loaded(&b), Some(&b_ref));
    }

    #[test]
    fn test_loading_context_cycle_error() {
        let mut ctx = LoadingContext::new(PathBuf::from("/p"));
        ctx.start_loading(PathBuf::from("/p/a.goblin")).unwrap();
        ctx.start_loading(PathBuf::from("/p/b.goblin")).unwrap();

        let err = ctx.start_loading(PathBuf::from("/p/a.goblin")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "circular import detected: a.goblin -> b.goblin -> a.goblin"
        );
    }

    #[test]
    fn test_cycle_error_omits_modules_leading_into_it() {
        let mut ctx = LoadingContext::new(PathBuf::from("/p"));
        ctx.start_loading(PathBuf::from("/p/main.goblin")).unwrap();
        ctx.start_loading(PathBuf::from("/p/a.goblin")).unwrap();
        ctx.start_loading(PathBuf::from("/p/b.goblin")).unwrap();

        let err = ctx.start_loading(PathBuf::from("/p/a.goblin")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "circular import detected: a.goblin -> b.goblin -> a.goblin"
        );
    }

    #[test]
    fn test_module_ref_idents_are_unique() {
        let mut ctx = LoadingContext::new(PathBuf::from("/p"));
        let first = ctx.module_ref(Path::new("/p/a_b.goblin"));
        let second = ctx.module_ref(Path::new("/p/a/b.goblin"));
        assert_eq!(first.ident, "a_b");
        assert_eq!(second.ident, "a_b_1");
        assert_eq!(second.stem, "a/b_1");
    }

    #[test]
    fn test_module_ref_stems_are_unique() {
        let mut ctx = LoadingContext::new(PathBuf::from("/p"));
        let dashed = ctx.module_ref(Path::new("/p/my-mod.goblin"));
        let underscored = ctx.module_ref(Path::new("/p/my_mod.goblin"));
        assert_eq!((dashed.stem.as_str(), dashed.ident.as_str()), ("my_mod", "my_mod"));
        assert_eq!(
            (underscored.stem.as_str(), underscored.ident.as_str()),
            ("my_mod_1", "my_mod_1")
        );
    }
}
