//! Implementation of `cmakegen analyze`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::{FileEntry, ModuleId, ProjectModel};
use crate::ops::cmakegen_scan::scan;
use crate::resolver::{
    collect_includes, dedup_warnings, resolve_project, DependencyGraph, ModuleOrder,
};
use crate::util::config::Config;
use crate::util::diagnostic::Warning;

/// A scanned and resolved project.
#[derive(Debug)]
pub struct Analysis {
    pub model: ProjectModel,
    pub graph: DependencyGraph,
    pub order: ModuleOrder,
    /// Scan, resolution and cycle warnings, in that order, without repeats
    pub warnings: Vec<Warning>,
}

/// Scan `root`, parse every file's includes and resolve them.
///
/// `on_file` is called before each file is read for includes, with the
/// file's 1-based position and the total number of files.
pub fn analyze<F>(
    root: &Path,
    config: &Config,
    name: Option<String>,
    mut on_file: F,
) -> Result<Analysis>
where
    F: FnMut(&FileEntry, usize, usize),
{
    let scanned = scan(root, config, name)?;
    let mut model = scanned.model;
    let mut warnings = scanned.warnings;

    let total = model.files().count();
    let mut current = 0;
    let (edges, read_warnings) = collect_includes(&model, |file| {
        current += 1;
        on_file(file, current, total);
    });
    warnings.extend(read_warnings);

    tracing::debug!("parsed {} include directives", edges.len());
    let resolution = resolve_project(&mut model, &edges);
    warnings.extend(resolution.warnings);

    let order = resolution.graph.topological_order();
    warnings.extend(order.warnings());
    dedup_warnings(&mut warnings);

    Ok(Analysis {
        model,
        graph: resolution.graph,
        order,
        warnings,
    })
}

/// Resolved includes of one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileDependencies {
    pub file: PathBuf,
    pub includes: Vec<PathBuf>,
}

/// One module's place in the graph.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleDependencies {
    pub id: ModuleId,
    pub dependencies: Vec<ModuleId>,
    pub transitive: Vec<ModuleId>,
    pub dependents: Vec<ModuleId>,
}

/// Serializable result of `cmakegen analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub project: String,
    pub files: Vec<FileDependencies>,
    pub modules: Vec<ModuleDependencies>,
    pub order: ModuleOrder,
    pub warnings: Vec<Warning>,
}

impl AnalysisReport {
    pub fn new(analysis: &Analysis) -> Self {
        let graph = &analysis.graph;

        let files = analysis
            .model
            .files()
            .map(|f| FileDependencies {
                file: f.rel_path.clone(),
                includes: graph
                    .file_deps(&f.rel_path)
                    .map(|deps| deps.iter().cloned().collect())
                    .unwrap_or_default(),
            })
            .collect();

        let modules = analysis
            .model
            .modules()
            .iter()
            .map(|m| ModuleDependencies {
                id: m.id().clone(),
                dependencies: graph.module_deps(m.id()),
                transitive: graph.transitive_module_deps(m.id()),
                dependents: graph.dependents(m.id()),
            })
            .collect();

        AnalysisReport {
            project: analysis.model.name().to_string(),
            files,
            modules,
            order: analysis.order.clone(),
            warnings: analysis.warnings.clone(),
        }
    }
}
