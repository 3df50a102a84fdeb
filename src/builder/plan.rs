//! Target planning.
//!
//! A [`BuildPlan`] decides, for every module, which CMake target it becomes,
//! what the target is called and what it links against. Rendering the plan
//! into documents is a separate, purely textual step.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::core::module::to_forward_slashes;
use crate::core::{
    CStandard, CppStandard, FileEntry, Language, LibraryType, Module, ModuleId, ProjectModel,
    TargetKind,
};
use crate::resolver::ModuleOrder;
use crate::util::config::{Config, DEFAULT_MIN_VERSION};
use crate::util::diagnostic::Warning;

/// Project-wide settings written into the documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorSettings {
    pub project_name: String,
    pub min_version: String,
    pub cpp_standard: CppStandard,
    pub c_standard: Option<CStandard>,
    pub cxx_required: bool,
    pub cxx_extensions: bool,
    pub library_type: LibraryType,
}

impl GeneratorSettings {
    /// Defaults for a project called `project_name`.
    pub fn new(project_name: impl Into<String>) -> Self {
        GeneratorSettings {
            project_name: project_name.into(),
            min_version: DEFAULT_MIN_VERSION.to_string(),
            cpp_standard: CppStandard::default(),
            c_standard: None,
            cxx_required: true,
            cxx_extensions: false,
            library_type: LibraryType::default(),
        }
    }

    /// Settings from a merged configuration.
    pub fn from_config(config: &Config, project_name: impl Into<String>) -> Result<Self> {
        Ok(GeneratorSettings {
            project_name: project_name.into(),
            min_version: config.min_version().to_string(),
            cpp_standard: config.cpp_standard()?,
            c_standard: config.c_standard()?,
            cxx_required: config.cxx_required(),
            cxx_extensions: config.cxx_extensions(),
            library_type: config.library_type()?,
        })
    }

    pub fn with_min_version(mut self, version: impl Into<String>) -> Self {
        self.min_version = version.into();
        self
    }

    pub fn with_library_type(mut self, library_type: LibraryType) -> Self {
        self.library_type = library_type;
        self
    }
}

/// One CMake target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetPlan {
    pub module: ModuleId,
    pub name: String,
    pub kind: TargetKind,
    /// Relative to the module directory
    pub sources: Vec<String>,
    /// Relative to the module directory
    pub headers: Vec<String>,
    /// Targets linked, in build order
    pub links: Vec<String>,
    /// Project-relative directories of executable modules this target
    /// includes headers from
    pub extra_include_dirs: Vec<String>,
}

/// Every target of a project, in build order.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub settings: GeneratorSettings,
    /// Languages for `project(... LANGUAGES ...)`
    pub languages: Vec<Language>,
    pub targets: Vec<TargetPlan>,
    /// Executable dependencies and the missing entry point note
    pub warnings: Vec<Warning>,
}

impl BuildPlan {
    /// Plan targets for `model`, ordered by `order`.
    ///
    /// Module dependency sets must already be filled in by the resolver.
    pub fn new(model: &ProjectModel, order: &ModuleOrder, settings: GeneratorSettings) -> Self {
        let names = assign_target_names(model, &settings.project_name);
        let kinds: HashMap<&ModuleId, TargetKind> = model
            .modules()
            .iter()
            .map(|m| (m.id(), target_kind(m, settings.library_type)))
            .collect();
        let position: HashMap<&ModuleId, usize> =
            order.order().iter().enumerate().map(|(i, id)| (id, i)).collect();

        let mut warnings = Vec::new();
        let mut targets = Vec::with_capacity(model.module_count());

        for id in order.order() {
            let Some(module) = model.module(id) else {
                continue;
            };
            let kind = kinds[id];

            let mut deps: Vec<&ModuleId> = module
                .dependencies()
                .iter()
                .filter(|d| kinds.contains_key(d))
                .collect();
            deps.sort_by_key(|d| position.get(d).copied().unwrap_or(usize::MAX));

            let mut links = Vec::new();
            let mut extra_include_dirs = Vec::new();
            for dep in deps {
                if kinds[dep].is_linkable() {
                    links.push(names[dep].clone());
                    continue;
                }

                tracing::debug!("`{}` uses headers of executable `{}`", id, dep);
                warnings.push(Warning::ExecutableDependency {
                    dependent: id.clone(),
                    executable: dep.clone(),
                });
                if !dep.is_root() {
                    extra_include_dirs.push(dep.as_str().to_string());
                }
            }

            let rel_dir = id.rel_dir();
            let relative = |files: &[FileEntry]| -> Vec<String> {
                files
                    .iter()
                    .map(|f| relative_to(&f.rel_path, &rel_dir))
                    .collect()
            };
            targets.push(TargetPlan {
                module: id.clone(),
                name: names[id].clone(),
                kind,
                sources: relative(module.sources()),
                headers: relative(module.headers()),
                links,
                extra_include_dirs,
            });
        }

        if !model.is_empty() && model.entry_point_modules().next().is_none() {
            tracing::info!("no entry point found in {} modules", model.module_count());
            warnings.push(Warning::NoEntryPoint);
        }

        let mut languages: Vec<Language> = model.languages().into_iter().collect();
        if languages.is_empty() {
            languages.push(Language::Cxx);
        }

        BuildPlan {
            settings,
            languages,
            targets,
            warnings,
        }
    }

    pub fn target(&self, module: &ModuleId) -> Option<&TargetPlan> {
        self.targets.iter().find(|t| &t.module == module)
    }

    pub fn root_target(&self) -> Option<&TargetPlan> {
        self.targets.iter().find(|t| t.module.is_root())
    }
}

fn target_kind(module: &Module, library_type: LibraryType) -> TargetKind {
    if module.has_entry_point() {
        TargetKind::Executable
    } else if module.is_header_only() {
        TargetKind::Interface
    } else {
        library_type.target_kind()
    }
}

fn relative_to(path: &Path, dir: &Path) -> String {
    to_forward_slashes(path.strip_prefix(dir).unwrap_or(path))
}

/// Replace every character CMake does not accept in a target name.
pub fn sanitize_target_name(raw: &str) -> String {
    let name: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() {
        "module".to_string()
    } else {
        name
    }
}

/// Choose a target name for every module.
///
/// The root module is named after the project; without one, so is the only
/// executable module, if there is exactly one. Other modules use their
/// directory name; when that name is shared with another module or with
/// the project, the whole relative path joined by `_` is used. Names that
/// still clash get a numeric suffix in discovery order.
pub fn assign_target_names(model: &ProjectModel, project_name: &str) -> HashMap<ModuleId, String> {
    let project = sanitize_target_name(project_name);
    let owner = project_name_owner(model);

    let mut base_counts: HashMap<String, usize> = HashMap::new();
    for module in model.modules().iter().filter(|m| Some(m.id()) != owner) {
        let base = sanitize_target_name(module.id().dir_name().unwrap_or_default());
        *base_counts.entry(base).or_default() += 1;
    }

    let mut taken: HashSet<String> = HashSet::new();
    let mut names = HashMap::new();

    if let Some(owner) = owner {
        taken.insert(project.clone());
        names.insert(owner.clone(), project.clone());
    }

    for module in model.modules().iter().filter(|m| Some(m.id()) != owner) {
        let id = module.id();
        let base = sanitize_target_name(id.dir_name().unwrap_or_default());
        let mut name = if base_counts[&base] > 1 || base == project {
            sanitize_target_name(&id.as_str().replace('/', "_"))
        } else {
            base
        };

        if taken.contains(&name) {
            let stem = name.clone();
            let mut n = 2;
            while taken.contains(&name) {
                name = format!("{stem}_{n}");
                n += 1;
            }
        }

        taken.insert(name.clone());
        names.insert(id.clone(), name);
    }

    names
}

/// The module whose target is named after the project: the root module,
/// or else the only module with an entry point.
fn project_name_owner(model: &ProjectModel) -> Option<&ModuleId> {
    if let Some(root) = model.root_module() {
        return Some(root.id());
    }

    let mut executables = model.modules().iter().filter(|m| m.has_entry_point());
    match (executables.next(), executables.next()) {
        (Some(only), None) => Some(only.id()),
        _ => None,
    }
}
