//! Module scanner - turns a directory tree into a [`ProjectModel`].

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::core::{FileClassifier, FileEntry, FileRole, ModuleId, ProjectModel};
use crate::sources::entry_point::{EntryPointDetector, MainFunctionDetector};
use crate::util::config::DEFAULT_EXCLUDES;
use crate::util::diagnostic::{ScanError, Warning};
use crate::util::fs::{normalize_path, read_lossy, relative_path};

/// Result of a scan: the model plus every non-fatal problem met on the way.
#[derive(Debug)]
pub struct ScanResult {
    pub model: ProjectModel,
    pub warnings: Vec<Warning>,
}

/// Walks a project tree and groups compilable files into modules.
///
/// Traversal order is deterministic: inside a directory, files come before
/// subdirectories and each group is sorted by name. The root directory's
/// files are therefore always seen first.
pub struct ModuleScanner {
    root: PathBuf,
    name: Option<String>,
    classifier: FileClassifier,
    excludes: Vec<Pattern>,
    detector: Box<dyn EntryPointDetector>,
}

impl ModuleScanner {
    /// Create a scanner with the default extension table, excludes and
    /// entry point detector.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let excludes = DEFAULT_EXCLUDES
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect();

        ModuleScanner {
            root: root.into(),
            name: None,
            classifier: FileClassifier::default(),
            excludes,
            detector: Box::new(MainFunctionDetector),
        }
    }

    /// Override the project name (defaults to the root directory name).
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Use a custom classifier.
    pub fn with_classifier(mut self, classifier: FileClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the directory exclude patterns (glob syntax, matched against
    /// directory names).
    pub fn with_excludes<I, S>(mut self, patterns: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excludes = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| ScanError::InvalidExcludePattern {
                    pattern: p.to_string(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Use a custom entry point detector.
    pub fn with_detector(mut self, detector: impl EntryPointDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.excludes.iter().any(|p| p.matches(&name))
    }

    /// Scan the tree.
    ///
    /// Fails only when the root is missing or not a directory; unreadable
    /// directories and files become warnings.
    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        if !self.root.exists() {
            return Err(ScanError::RootNotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ScanError::RootNotDirectory(self.root.clone()));
        }

        let root = normalize_path(&self.root);
        let mut model = ProjectModel::new(root.clone());
        if let Some(name) = &self.name {
            model = model.with_name(name.clone());
        }
        let mut warnings = Vec::new();

        tracing::debug!("scanning {}", root.display());

        let walker = WalkDir::new(&root)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e));

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| relative_path(&root, p))
                        .unwrap_or_default();
                    let reason = err
                        .io_error()
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| err.to_string());
                    tracing::warn!("skipping unreadable directory {}: {}", path.display(), reason);
                    warnings.push(Warning::UnreadableDirectory { path, reason });
                    continue;
                }
            };

            // dangling links are kept so they surface as unreadable files
            let dangling = entry.path_is_symlink() && std::fs::metadata(entry.path()).is_err();
            if entry.file_type().is_dir() || !(entry.path().is_file() || dangling) {
                continue;
            }

            let role = self.classifier.classify(entry.path());
            if !role.is_compilable() {
                continue;
            }

            let rel_path = relative_path(&root, entry.path());
            let module = ModuleId::from_rel_dir(rel_path.parent().unwrap_or(Path::new("")));
            let file = FileEntry::new(entry.path().to_path_buf(), rel_path.clone(), role, module.clone());
            model.add_file(file);

            if let FileRole::Source(_) = role {
                match read_lossy(entry.path()) {
                    Ok(text) => {
                        if self.detector.has_entry_point(&text) {
                            tracing::debug!("entry point in {}", rel_path.display());
                            if let Some(m) = model.module_mut(&module) {
                                m.mark_entry_point();
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!("could not read {}: {}", rel_path.display(), e);
                        warnings.push(Warning::UnreadableFile {
                            path: rel_path,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            "found {} source files and {} header files in {} modules",
            model.source_count(),
            model.header_count(),
            model.module_count()
        );

        Ok(ScanResult { model, warnings })
    }
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
