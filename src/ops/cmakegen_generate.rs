//! Implementation of `cmakegen generate`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::builder::{
    render_documents, write_documents, BuildPlan, DocumentOutcome, DocumentResult,
    GeneratorSettings,
};
use crate::core::{FileEntry, ModuleId};
use crate::ops::cmakegen_analyze::analyze;
use crate::resolver::{dedup_warnings, ModuleOrder};
use crate::util::config::Config;
use crate::util::diagnostic::Warning;

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Project name (defaults to the root directory name)
    pub name: Option<String>,

    /// Overrides `cmake.min_version`
    pub min_version: Option<String>,

    /// Overwrite existing `CMakeLists.txt` files
    pub force: bool,
}

/// Everything a generation run produced.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub project: String,
    pub root: PathBuf,
    pub source_files: usize,
    pub header_files: usize,
    pub modules: usize,
    pub order: ModuleOrder,
    pub warnings: Vec<Warning>,
    pub documents: Vec<DocumentResult>,
}

impl GenerationReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Written))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Failed { .. }))
    }

    /// True when no document failed to write.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn document(&self, module: &ModuleId) -> Option<&DocumentResult> {
        self.documents.iter().find(|d| &d.module == module)
    }

    fn count(&self, pred: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents.iter().filter(|d| pred(&d.outcome)).count()
    }
}

/// Run the whole pipeline over `root` and write the documents.
///
/// Only a fatal input error (or invalid configuration) is returned as `Err`;
/// every other condition ends up in the report.
pub fn generate<F>(
    root: &Path,
    config: &Config,
    opts: &GenerateOptions,
    on_file: F,
) -> Result<GenerationReport>
where
    F: FnMut(&FileEntry, usize, usize),
{
    let analysis = analyze(root, config, opts.name.clone(), on_file)?;
    let model = analysis.model;

    let mut settings = GeneratorSettings::from_config(config, model.name())?;
    if let Some(version) = &opts.min_version {
        settings = settings.with_min_version(version.clone());
    }

    let plan = BuildPlan::new(&model, &analysis.order, settings);
    tracing::info!(
        "planned {} targets for `{}`",
        plan.targets.len(),
        model.name()
    );

    let docs = render_documents(&plan);
    let documents = write_documents(model.root(), &docs, opts.force);

    let mut warnings = analysis.warnings;
    warnings.extend(plan.warnings);
    warnings.extend(
        documents
            .iter()
            .filter(|d| d.outcome == DocumentOutcome::Skipped)
            .map(|d| Warning::OutputExists {
                module: d.module.clone(),
                path: d.path.clone(),
            }),
    );
    dedup_warnings(&mut warnings);

    Ok(GenerationReport {
        project: model.name().to_string(),
        root: model.root().to_path_buf(),
        source_files: model.source_count(),
        header_files: model.header_count(),
        modules: model.module_count(),
        order: analysis.order,
        warnings,
        documents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CMAKELISTS;
    use crate::test_support::{disjoint_modules, multi_module, mutual_modules, ProjectFixture};

    fn opts(name: &str) -> GenerateOptions {
        GenerateOptions {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn run(fixture: &ProjectFixture, opts: &GenerateOptions) -> GenerationReport {
        generate(fixture.path(), &Config::default(), opts, |_, _, _| {}).unwrap()
    }

    #[test]
    fn test_single_directory_executable() {
        let fixture = ProjectFixture::new()
            .file(
                "main.cpp",
                "#include \"utils.h\"\n\nint main() {\n    return helper();\n}\n",
            )
            .file("utils.h", "#pragma once\nint helper();\n")
            .file("utils.cpp", "#include \"utils.h\"\nint helper() { return 0; }\n");

        let report = run(&fixture, &opts("demo"));

        assert_eq!(report.modules, 1);
        assert_eq!((report.source_files, report.header_files), (2, 1));
        assert_eq!(report.documents.len(), 1);
        assert!(report.is_success());
        assert!(report.warnings.is_empty());

        let doc = fixture.read(CMAKELISTS);
        assert!(doc.contains("add_executable(demo\n    main.cpp\n    utils.cpp\n    utils.h\n)"));
        assert!(!doc.contains("target_link_libraries"));
        assert!(!doc.contains("add_subdirectory"));
    }

    #[test]
    fn test_library_only_project_notes_missing_entry_point() {
        let fixture = ProjectFixture::new().file("lib.c", "int lib(void) { return 1; }\n");

        let report = run(&fixture, &opts("lib"));
        assert!(report.warnings.contains(&Warning::NoEntryPoint));
        let doc = fixture.read(CMAKELISTS);
        assert!(doc.contains("project(lib LANGUAGES C)"));
        assert!(doc.contains("add_library(lib STATIC"));
    }

    #[test]
    fn test_disjoint_modules_get_one_document_each() {
        let fixture = disjoint_modules(3);
        let report = run(&fixture, &opts("disjoint"));

        assert_eq!(report.modules, 3);
        assert_eq!(report.documents.len(), 4);
        assert_eq!(report.written(), 4);

        for i in 0..3 {
            let doc = fixture.read(format!("mod{i}/{CMAKELISTS}"));
            assert!(doc.contains(&format!("add_library(mod{i} STATIC")));
            assert!(!doc.contains("target_link_libraries"));
        }
        let root = fixture.read(CMAKELISTS);
        assert!(root.contains("add_subdirectory(mod0)\nadd_subdirectory(mod1)\nadd_subdirectory(mod2)\n"));
    }

    #[test]
    fn test_multi_module_links_in_build_order() {
        let fixture = multi_module();
        let report = run(&fixture, &opts("calc"));

        assert_eq!(report.documents.len(), 4);
        let root = fixture.read(CMAKELISTS);
        let utils = root.find("add_subdirectory(src/utils)").unwrap();
        let math = root.find("add_subdirectory(src/math)").unwrap();
        let src = root.find("add_subdirectory(src)\n").unwrap();
        assert!(utils < math && math < src);

        let app = fixture.read(format!("src/{CMAKELISTS}"));
        assert!(app.contains("add_executable(calc"));
        assert!(app.contains("target_link_libraries(calc PRIVATE\n    utils\n    math\n)"));
    }

    #[test]
    fn test_regenerate_skips_unless_forced() {
        let fixture = disjoint_modules(1);
        run(&fixture, &opts("once"));

        let path = fixture.join(CMAKELISTS);
        std::fs::write(&path, "# hand edited\n").unwrap();

        let report = run(&fixture, &opts("once"));
        assert_eq!(report.written(), 0);
        assert_eq!(report.skipped(), 2);
        assert!(report.warnings.contains(&Warning::OutputExists {
            module: ModuleId::root(),
            path: PathBuf::from(CMAKELISTS),
        }));
        assert_eq!(fixture.read(CMAKELISTS), "# hand edited\n");

        let forced = GenerateOptions {
            force: true,
            ..opts("once")
        };
        let report = run(&fixture, &forced);
        assert_eq!(report.written(), 2);
        assert!(fixture.read(CMAKELISTS).starts_with("cmake_minimum_required"));
    }

    #[test]
    fn test_min_version_override() {
        let fixture = disjoint_modules(1);
        let options = GenerateOptions {
            min_version: Some("3.20".to_string()),
            ..opts("pinned")
        };
        run(&fixture, &options);
        assert!(fixture
            .read(CMAKELISTS)
            .starts_with("cmake_minimum_required(VERSION 3.20)\n"));
    }

    #[test]
    fn test_mutual_cycle_is_deterministic() {
        let first = mutual_modules();
        let second = mutual_modules();
        let a = run(&first, &opts("cyclic"));
        let b = run(&second, &opts("cyclic"));

        assert!(!a.order.is_acyclic());
        assert_eq!(a.order, b.order);
        assert!(a
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::ModuleCycle { .. })));
        assert_eq!(first.read(CMAKELISTS), second.read(CMAKELISTS));
        assert_eq!(first.read(format!("x/{CMAKELISTS}")), second.read(format!("x/{CMAKELISTS}")));
    }
}
