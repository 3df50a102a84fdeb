//! Include resolution and module aggregation.
//!
//! A quoted include is matched against the project's headers in three
//! steps: relative to the including file, relative to the project root,
//! then by file name alone.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::{FileEntry, ModuleId, ProjectModel};
use crate::resolver::graph::DependencyGraph;
use crate::resolver::include::{parse_includes, IncludeEdge};
use crate::util::diagnostic::Warning;
use crate::util::fs::{normalize_lexically, read_lossy};

/// Outcome of resolving one include token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum IncludeResolution {
    Resolved { header: PathBuf },
    /// Several headers share the file name; the first in discovery order wins.
    Ambiguous {
        chosen: PathBuf,
        candidates: Vec<PathBuf>,
    },
    Unresolved,
}

impl IncludeResolution {
    /// The header the include ends up pointing at, if any.
    pub fn target(&self) -> Option<&Path> {
        match self {
            IncludeResolution::Resolved { header } => Some(header),
            IncludeResolution::Ambiguous { chosen, .. } => Some(chosen),
            IncludeResolution::Unresolved => None,
        }
    }
}

/// Output of [`resolve_project`].
#[derive(Debug)]
pub struct Resolution {
    pub graph: DependencyGraph,
    pub warnings: Vec<Warning>,
}

/// Every header of a project, indexed for the three lookup steps.
pub struct DependencyResolver {
    /// Project-relative header path -> owning module
    headers: HashMap<PathBuf, ModuleId>,
    /// File name -> headers with that name, in discovery order
    by_name: HashMap<String, Vec<PathBuf>>,
    /// Owning module of every classified file
    owners: HashMap<PathBuf, ModuleId>,
}

impl DependencyResolver {
    pub fn new(model: &ProjectModel) -> Self {
        let mut headers = HashMap::new();
        let mut by_name: HashMap<String, Vec<PathBuf>> = HashMap::new();
        let mut owners = HashMap::new();

        for file in model.files() {
            owners.insert(file.rel_path.clone(), file.module.clone());
        }
        for header in model.headers() {
            headers.insert(header.rel_path.clone(), header.module.clone());
            if let Some(name) = header.file_name() {
                by_name
                    .entry(name.to_string())
                    .or_default()
                    .push(header.rel_path.clone());
            }
        }

        DependencyResolver {
            headers,
            by_name,
            owners,
        }
    }

    /// Resolve `token` as written in `from` (project-relative).
    pub fn resolve(&self, from: &Path, token: &str) -> IncludeResolution {
        let token_path = Path::new(token);
        let from_dir = from.parent().unwrap_or(Path::new(""));

        for base in [from_dir, Path::new("")] {
            if let Some(candidate) = normalize_lexically(&base.join(token_path)) {
                if self.headers.contains_key(&candidate) {
                    return IncludeResolution::Resolved { header: candidate };
                }
            }
        }

        let Some(name) = token_path.file_name().and_then(|n| n.to_str()) else {
            return IncludeResolution::Unresolved;
        };
        match self.by_name.get(name).map(Vec::as_slice) {
            None | Some([]) => IncludeResolution::Unresolved,
            Some([only]) => IncludeResolution::Resolved {
                header: only.clone(),
            },
            Some(all @ [first, ..]) => IncludeResolution::Ambiguous {
                chosen: first.clone(),
                candidates: all.to_vec(),
            },
        }
    }

    /// Module owning a project-relative file.
    pub fn owner(&self, file: &Path) -> Option<&ModuleId> {
        self.owners.get(file)
    }
}

/// Read every source and header of `model` and parse its includes.
///
/// `on_file` is called before each file is read. Unreadable files yield an
/// [`Warning::UnreadableFile`] and no edges.
pub fn collect_includes<F>(model: &ProjectModel, mut on_file: F) -> (Vec<IncludeEdge>, Vec<Warning>)
where
    F: FnMut(&FileEntry),
{
    let mut edges = Vec::new();
    let mut warnings = Vec::new();

    for file in model.files() {
        on_file(file);
        match read_lossy(&file.path) {
            Ok(text) => edges.extend(parse_includes(&file.rel_path, &text)),
            Err(e) => {
                tracing::warn!("could not read {}: {}", file.rel_path.display(), e);
                warnings.push(Warning::UnreadableFile {
                    path: file.rel_path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (edges, warnings)
}

/// Resolve `edges` against `model`, build the dependency graph and record
/// each module's dependency set on the model.
///
/// System includes are skipped; unresolved and ambiguous includes become
/// warnings.
pub fn resolve_project(model: &mut ProjectModel, edges: &[IncludeEdge]) -> Resolution {
    let resolver = DependencyResolver::new(model);
    let mut graph = DependencyGraph::for_model(model);
    let mut warnings = Vec::new();
    let mut unresolved = 0usize;

    for edge in edges.iter().filter(|e| e.is_local) {
        let resolution = resolver.resolve(&edge.from, &edge.token);
        match &resolution {
            IncludeResolution::Resolved { .. } => {}
            IncludeResolution::Ambiguous { chosen, candidates } => {
                tracing::debug!(
                    "\"{}\" in {} is ambiguous, using {}",
                    edge.token,
                    edge.from.display(),
                    chosen.display()
                );
                warnings.push(Warning::AmbiguousInclude {
                    file: edge.from.clone(),
                    line: edge.line,
                    token: edge.token.clone(),
                    chosen: chosen.clone(),
                    candidates: candidates.clone(),
                });
            }
            IncludeResolution::Unresolved => {
                unresolved += 1;
                warnings.push(Warning::UnresolvedInclude {
                    file: edge.from.clone(),
                    line: edge.line,
                    token: edge.token.clone(),
                });
            }
        }

        let Some(header) = resolution.target() else {
            continue;
        };
        graph.add_file_edge(&edge.from, header);

        if let (Some(from), Some(to)) = (resolver.owner(&edge.from), resolver.owner(header)) {
            graph.add_module_edge(from, to);
        }
    }

    let ids: Vec<ModuleId> = model.modules().iter().map(|m| m.id().clone()).collect();
    for id in ids {
        let deps: BTreeSet<ModuleId> = graph.module_deps(&id).into_iter().collect();
        if let Some(module) = model.module_mut(&id) {
            module.set_dependencies(deps);
        }
    }

    tracing::info!(
        "resolved {} file edges, {} module edges ({} includes unresolved)",
        graph.file_edge_count(),
        graph.module_edge_count(),
        unresolved
    );

    Resolution { graph, warnings }
}

/// Drop repeated warnings, keeping the first occurrence.
pub fn dedup_warnings(warnings: &mut Vec<Warning>) {
    let mut seen = HashSet::new();
    warnings.retain(|w| seen.insert(w.clone()));
}
