//! The project model produced by a scan.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::language::Language;
use crate::core::module::{FileEntry, Module, ModuleId};

/// All modules of one project, in discovery order.
///
/// The model is a flat mapping keyed by module identifier; it does not
/// mirror the directory hierarchy. Directories without compilable files
/// never appear.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectModel {
    root: PathBuf,
    name: String,
    modules: Vec<Module>,
    #[serde(skip)]
    index: HashMap<ModuleId, usize>,
}

impl ProjectModel {
    /// Create an empty model rooted at `root`.
    ///
    /// The project name defaults to the root directory's name.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());

        ProjectModel {
            root,
            name,
            modules: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Override the project name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Modules in discovery order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.index.get(id).map(|&i| &self.modules[i])
    }

    pub(crate) fn module_mut(&mut self, id: &ModuleId) -> Option<&mut Module> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.modules[i]),
            None => None,
        }
    }

    /// The root module, if the root directory holds compilable files.
    pub fn root_module(&self) -> Option<&Module> {
        self.module(&ModuleId::root())
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a module in discovery order.
    pub fn position(&self, id: &ModuleId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Attach a file to its module, creating the module on first sight.
    pub(crate) fn add_file(&mut self, entry: FileEntry) {
        let idx = match self.index.get(&entry.module) {
            Some(&i) => i,
            None => {
                tracing::debug!("discovered module `{}`", entry.module);
                let i = self.modules.len();
                self.index.insert(entry.module.clone(), i);
                self.modules.push(Module::new(entry.module.clone()));
                i
            }
        };
        self.modules[idx].push_file(entry);
    }

    /// Every source file, module by module.
    pub fn sources(&self) -> impl Iterator<Item = &FileEntry> {
        self.modules.iter().flat_map(|m| m.sources().iter())
    }

    /// Every header file, module by module.
    pub fn headers(&self) -> impl Iterator<Item = &FileEntry> {
        self.modules.iter().flat_map(|m| m.headers().iter())
    }

    /// Every compilable file, module by module.
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.modules.iter().flat_map(|m| m.files())
    }

    pub fn source_count(&self) -> usize {
        self.modules.iter().map(|m| m.sources().len()).sum()
    }

    pub fn header_count(&self) -> usize {
        self.modules.iter().map(|m| m.headers().len()).sum()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules that define a program entry point.
    pub fn entry_point_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter().filter(|m| m.has_entry_point())
    }

    /// Languages used anywhere in the project.
    pub fn languages(&self) -> BTreeSet<Language> {
        self.modules.iter().flat_map(|m| m.languages()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_kind::classify;

    fn entry(rel: &str) -> FileEntry {
        let rel = PathBuf::from(rel);
        let module = ModuleId::from_rel_dir(rel.parent().unwrap_or(Path::new("")));
        FileEntry::new(Path::new("/proj").join(&rel), rel.clone(), classify(&rel), module)
    }

    #[test]
    fn test_model_keeps_discovery_order() {
        let mut model = ProjectModel::new("/proj");
        model.add_file(entry("main.c"));
        model.add_file(entry("util/b.c"));
        model.add_file(entry("net/a.c"));
        model.add_file(entry("util/b.h"));

        let ids: Vec<_> = model.modules().iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, vec!["(root)", "util", "net"]);
        assert_eq!(model.source_count(), 3);
        assert_eq!(model.header_count(), 1);
        assert_eq!(model.position(&ModuleId::from_rel_dir(Path::new("net"))), Some(2));
        assert!(model.root_module().is_some());
    }

    #[test]
    fn test_model_name() {
        assert_eq!(ProjectModel::new("/work/demo").name(), "demo");
        assert_eq!(ProjectModel::new("/work/demo").with_name("app").name(), "app");
    }
}
