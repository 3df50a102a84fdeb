//! Implementation of `cmakegen scan`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::{FileClassifier, ModuleId, ProjectModel};
use crate::sources::{ModuleScanner, ScanResult};
use crate::util::config::Config;
use crate::util::diagnostic::Warning;

/// Build a scanner for `root` from configuration.
pub fn configured_scanner(root: &Path, config: &Config, name: Option<String>) -> Result<ModuleScanner> {
    let classifier = FileClassifier::new()
        .with_source_extensions(&config.scan.source_extensions)
        .with_header_extensions(&config.scan.header_extensions);

    let scanner = ModuleScanner::new(root)
        .with_name(name)
        .with_classifier(classifier)
        .with_excludes(config.exclude_patterns())?;

    Ok(scanner)
}

/// Scan `root` into a project model.
///
/// Fails only on the fatal input errors (missing root, root not a
/// directory, invalid exclude pattern).
pub fn scan(root: &Path, config: &Config, name: Option<String>) -> Result<ScanResult> {
    let result = configured_scanner(root, config, name)?.scan()?;
    Ok(result)
}

/// Per-module summary.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub id: ModuleId,
    pub sources: usize,
    pub headers: usize,
    pub has_entry_point: bool,
}

/// Serializable result of `cmakegen scan`.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub project: String,
    pub root: PathBuf,
    pub source_files: usize,
    pub header_files: usize,
    pub modules: Vec<ModuleSummary>,
    pub warnings: Vec<Warning>,
}

impl ScanReport {
    pub fn new(model: &ProjectModel, warnings: Vec<Warning>) -> Self {
        ScanReport {
            project: model.name().to_string(),
            root: model.root().to_path_buf(),
            source_files: model.source_count(),
            header_files: model.header_count(),
            modules: model
                .modules()
                .iter()
                .map(|m| ModuleSummary {
                    id: m.id().clone(),
                    sources: m.sources().len(),
                    headers: m.headers().len(),
                    has_entry_point: m.has_entry_point(),
                })
                .collect(),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ProjectFixture;

    #[test]
    fn test_scan_uses_configured_extensions_and_excludes() {
        let fixture = ProjectFixture::new()
            .file("main.cpp", "int main() { return 0; }\n")
            .file("gpu/kernel.cu", "")
            .file("gpu/kernel.cuh", "")
            .file("third_party/x.c", "")
            .file("build/gen.c", "");

        let mut config = Config::default();
        config.scan.source_extensions = vec!["cu".to_string()];
        config.scan.header_extensions = vec![".cuh".to_string()];
        config.scan.exclude = Some(vec!["third_party".to_string()]);

        let result = scan(fixture.path(), &config, Some("gpu-demo".to_string())).unwrap();
        let report = ScanReport::new(&result.model, result.warnings);

        assert_eq!(report.project, "gpu-demo");
        let ids: Vec<_> = report.modules.iter().map(|m| m.id.as_str()).collect();
        // `build` is no longer excluded once the list is overridden
        assert_eq!(ids, vec!["(root)", "build", "gpu"]);
        let gpu = &report.modules[2];
        assert_eq!((gpu.sources, gpu.headers), (1, 1));
        assert!(report.modules[0].has_entry_point);
    }

    #[test]
    fn test_missing_root_fails() {
        let fixture = ProjectFixture::new();
        let err = scan(&fixture.path().join("missing"), &Config::default(), None).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
