//! Events printed with `--message-format json`.
//!
//! One object per stdout line, discriminated by its `reason`:
//! `scan-finished`, `progress`, `warning`, `document`, `generate-finished`,
//! `build-started` and `build-finished`. Fields are only ever added.

use std::path::PathBuf;

use serde::Serialize;

use crate::builder::cmakelists::DocumentResult;
use crate::util::diagnostic::{Severity, Warning};

/// Something a JSON consumer can react to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum PipelineEvent {
    /// The tree was scanned.
    #[serde(rename = "scan-finished")]
    ScanFinished {
        project: String,
        root: PathBuf,
        source_files: usize,
        header_files: usize,
        modules: usize,
    },

    /// Progress update.
    #[serde(rename = "progress")]
    Progress {
        current: u64,
        total: u64,
        /// Unit type (e.g., "files")
        unit: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        phase: Option<String>,
    },

    /// A non-fatal condition.
    #[serde(rename = "warning")]
    Warning {
        level: Severity,
        message: String,
        detail: Warning,
    },

    /// Outcome of one document.
    #[serde(rename = "document")]
    Document(DocumentResult),

    /// Generation completed.
    #[serde(rename = "generate-finished")]
    GenerateFinished {
        success: bool,
        written: usize,
        skipped: usize,
        failed: usize,
        duration_ms: u64,
    },

    /// CMake is about to configure the project.
    #[serde(rename = "build-started")]
    BuildStarted {
        source_dir: PathBuf,
        build_dir: PathBuf,
        build_type: String,
    },

    /// CMake configure and build completed.
    #[serde(rename = "build-finished")]
    BuildFinished { success: bool, duration_ms: u64 },
}

impl PipelineEvent {
    pub fn warning(warning: &Warning) -> Self {
        PipelineEvent::Warning {
            level: warning.severity(),
            message: warning.to_string(),
            detail: warning.clone(),
        }
    }

    pub fn build_finished(success: bool, duration_ms: u64) -> Self {
        PipelineEvent::BuildFinished {
            success,
            duration_ms,
        }
    }
}
