//! Modules - one per directory holding compilable files.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::core::file_kind::FileRole;
use crate::core::language::Language;

/// Identifier of a module.
///
/// Derived from the module directory relative to the project root, with
/// `/` separators on every platform. The project root is held as the empty
/// path, so no directory name can collide with it; it renders as `(root)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(String);

impl ModuleId {
    /// Display name of the root module.
    pub const ROOT: &'static str = "(root)";

    /// The root module identifier.
    pub fn root() -> Self {
        ModuleId(String::new())
    }

    /// Identifier for a directory relative to the project root.
    ///
    /// An empty path (or `.`) is the root module.
    pub fn from_rel_dir(dir: &Path) -> Self {
        let parts: Vec<String> = dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        ModuleId(parts.join("/"))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// `(root)` for the root module, the relative directory otherwise.
    pub fn as_str(&self) -> &str {
        if self.is_root() {
            Self::ROOT
        } else {
            &self.0
        }
    }

    /// Module directory relative to the project root (empty for the root).
    pub fn rel_dir(&self) -> PathBuf {
        if self.is_root() {
            PathBuf::new()
        } else {
            self.0.split('/').collect()
        }
    }

    /// Last path component, or `None` for the root module.
    pub fn dir_name(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            self.0.rsplit('/').next()
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ModuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A classified file. Immutable once created by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the project root
    pub rel_path: PathBuf,
    /// Source or header
    pub role: FileRole,
    /// Owning module
    pub module: ModuleId,
}

impl FileEntry {
    pub fn new(path: PathBuf, rel_path: PathBuf, role: FileRole, module: ModuleId) -> Self {
        FileEntry {
            path,
            rel_path,
            role,
            module,
        }
    }

    /// File name component.
    pub fn file_name(&self) -> Option<&str> {
        self.rel_path.file_name().and_then(|n| n.to_str())
    }

    /// Project-relative path with `/` separators, as written in documents.
    pub fn display_path(&self) -> String {
        to_forward_slashes(&self.rel_path)
    }
}

/// A unit of build granularity.
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    id: ModuleId,
    sources: Vec<FileEntry>,
    headers: Vec<FileEntry>,
    has_entry_point: bool,
    dependencies: BTreeSet<ModuleId>,
}

impl Module {
    /// Create an empty module.
    pub fn new(id: ModuleId) -> Self {
        Module {
            id,
            sources: Vec::new(),
            headers: Vec::new(),
            has_entry_point: false,
            dependencies: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    pub fn sources(&self) -> &[FileEntry] {
        &self.sources
    }

    pub fn headers(&self) -> &[FileEntry] {
        &self.headers
    }

    /// Sources followed by headers.
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.sources.iter().chain(self.headers.iter())
    }

    pub fn has_entry_point(&self) -> bool {
        self.has_entry_point
    }

    /// A module without sources builds nothing; it becomes an INTERFACE library.
    pub fn is_header_only(&self) -> bool {
        self.sources.is_empty()
    }

    /// Modules this module includes headers from.
    pub fn dependencies(&self) -> &BTreeSet<ModuleId> {
        &self.dependencies
    }

    /// Languages of this module's sources.
    pub fn languages(&self) -> BTreeSet<Language> {
        self.sources
            .iter()
            .filter_map(|f| match f.role {
                FileRole::Source(lang) => Some(lang),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn push_file(&mut self, entry: FileEntry) {
        debug_assert_eq!(entry.module, self.id);
        match entry.role {
            FileRole::Source(_) => self.sources.push(entry),
            FileRole::Header => self.headers.push(entry),
            FileRole::Other => {}
        }
    }

    pub(crate) fn mark_entry_point(&mut self) {
        self.has_entry_point = true;
    }

    pub(crate) fn set_dependencies(&mut self, deps: BTreeSet<ModuleId>) {
        self.dependencies = deps;
        self.dependencies.remove(&self.id);
    }
}

/// Render a relative path with `/` separators.
pub fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_kind::classify;

    #[test]
    fn test_module_id_from_dir() {
        assert!(ModuleId::from_rel_dir(Path::new("")).is_root());
        assert!(ModuleId::from_rel_dir(Path::new(".")).is_root());

        let id = ModuleId::from_rel_dir(&Path::new("src").join("math"));
        assert_eq!(id.as_str(), "src/math");
        assert_eq!(id.dir_name(), Some("math"));
        assert_eq!(id.rel_dir(), Path::new("src").join("math"));
        assert_eq!(ModuleId::root().to_string(), "(root)");
    }

    #[test]
    fn test_directory_named_like_root_is_not_root() {
        let id = ModuleId::from_rel_dir(Path::new("(root)"));
        assert!(!id.is_root());
        assert_ne!(id, ModuleId::root());
        assert_eq!(id.dir_name(), Some("(root)"));
        assert_eq!(id.rel_dir(), PathBuf::from("(root)"));
        assert_eq!(ModuleId::root().rel_dir(), PathBuf::new());
    }

    #[test]
    fn test_module_file_lists() {
        let id = ModuleId::from_rel_dir(Path::new("lib"));
        let mut module = Module::new(id.clone());
        assert!(module.is_header_only());

        for name in ["lib/a.c", "lib/a.h", "lib/b.cpp"] {
            let rel = PathBuf::from(name);
            module.push_file(FileEntry::new(
                PathBuf::from("/p").join(&rel),
                rel.clone(),
                classify(&rel),
                id.clone(),
            ));
        }

        assert_eq!(module.sources().len(), 2);
        assert_eq!(module.headers().len(), 1);
        assert!(!module.is_header_only());
        assert_eq!(module.languages().len(), 2);
    }

    #[test]
    fn test_dependencies_drop_self_loop() {
        let id = ModuleId::from_rel_dir(Path::new("a"));
        let mut module = Module::new(id.clone());
        module.set_dependencies(
            [id.clone(), ModuleId::from_rel_dir(Path::new("b"))]
                .into_iter()
                .collect(),
        );
        assert_eq!(module.dependencies().len(), 1);
        assert!(!module.dependencies().contains(&id));
    }
}
