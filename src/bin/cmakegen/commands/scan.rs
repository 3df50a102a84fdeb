//! `cmakegen scan` command

use std::sync::Arc;

use anyhow::Result;

use crate::cli::ScanArgs;
use crate::commands::{project_root, scan_status};
use cmakegen::builder::PipelineEvent;
use cmakegen::ops::{scan, ScanReport};
use cmakegen::util::{GlobalContext, Shell};

pub fn execute(args: ScanArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let root = project_root(&ctx, args.path.as_deref())?;
    let config = ctx.load_config(&root);

    let result = scan(&root, &config, args.name)?;
    let report = ScanReport::new(&result.model, result.warnings);

    if shell.is_json() {
        shell.event(&PipelineEvent::ScanFinished {
            project: report.project.clone(),
            root: report.root.clone(),
            source_files: report.source_files,
            header_files: report.header_files,
            modules: report.modules.len(),
        });
        for warning in &report.warnings {
            shell.warning(warning);
        }
        shell.print_json(&report);
        return Ok(());
    }

    scan_status(
        shell,
        &report.project,
        report.source_files,
        report.header_files,
        report.modules.len(),
    );
    for warning in &report.warnings {
        shell.warning(warning);
    }

    if report.modules.is_empty() {
        shell.note("no source or header files found");
        return Ok(());
    }

    println!("Modules:");
    let width = report
        .modules
        .iter()
        .map(|m| m.id.as_str().len())
        .max()
        .unwrap_or(0);
    for module in &report.modules {
        let entry = if module.has_entry_point { "  (main)" } else { "" };
        println!(
            "  {:<width$}  {} sources, {} headers{}",
            module.id.as_str(),
            module.sources,
            module.headers,
            entry,
            width = width
        );
    }

    Ok(())
}
