//! `cmakegen generate` command

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};

use crate::cli::GenerateArgs;
use crate::commands::{file_progress, project_root, scan_status};
use cmakegen::builder::{DocumentOutcome, PipelineEvent};
use cmakegen::core::module::to_forward_slashes;
use cmakegen::ops::{generate, GenerateOptions, GenerationReport};
use cmakegen::util::diagnostic::Warning;
use cmakegen::util::shell::Status;
use cmakegen::util::{GlobalContext, Shell};

pub fn execute(args: GenerateArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let root = project_root(&ctx, args.path.as_deref())?;
    let config = ctx.load_config(&root);

    let opts = GenerateOptions {
        name: args.name,
        min_version: args.min_version,
        force: args.force,
    };

    let start = Instant::now();
    let mut progress = None;
    let report = generate(&root, &config, &opts, file_progress(shell, &mut progress))?;
    if let Some(progress) = &progress {
        progress.finish();
    }

    if shell.is_json() {
        emit_events(shell, &report, start.elapsed().as_millis() as u64);
    } else {
        print_report(shell, &report, start.elapsed());
    }

    if !report.is_success() {
        bail!(
            "failed to write {} of {} documents",
            report.failed(),
            report.documents.len()
        );
    }

    Ok(())
}

fn emit_events(shell: &Shell, report: &GenerationReport, duration_ms: u64) {
    shell.event(&PipelineEvent::ScanFinished {
        project: report.project.clone(),
        root: report.root.clone(),
        source_files: report.source_files,
        header_files: report.header_files,
        modules: report.modules,
    });
    for warning in &report.warnings {
        shell.warning(warning);
    }
    for document in &report.documents {
        shell.event(&PipelineEvent::Document(document.clone()));
    }
    shell.event(&PipelineEvent::GenerateFinished {
        success: report.is_success(),
        written: report.written(),
        skipped: report.skipped(),
        failed: report.failed(),
        duration_ms,
    });
}

fn print_report(shell: &Shell, report: &GenerationReport, elapsed: std::time::Duration) {
    scan_status(
        shell,
        &report.project,
        report.source_files,
        report.header_files,
        report.modules,
    );

    // skipped documents get their own status line below
    for warning in &report.warnings {
        if !matches!(warning, Warning::OutputExists { .. }) {
            shell.warning(warning);
        }
    }

    for document in &report.documents {
        let path = to_forward_slashes(&document.path);
        match &document.outcome {
            DocumentOutcome::Written => shell.status(Status::Generated, &path),
            DocumentOutcome::Skipped => shell.status(
                Status::Skipped,
                format!("{} (already exists, use --force to overwrite)", path),
            ),
            DocumentOutcome::Failed { reason } => {
                shell.error(format!("failed to write {}: {}", path, reason))
            }
        }
    }

    shell.status(
        Status::Finished,
        format!(
            "{} written, {} skipped, {} failed in {:.2}s",
            report.written(),
            report.skipped(),
            report.failed(),
            elapsed.as_secs_f64()
        ),
    );
}
