//! `cmakegen analyze` command

use std::sync::Arc;

use anyhow::Result;

use crate::cli::AnalyzeArgs;
use crate::commands::{file_progress, project_root, scan_status};
use cmakegen::builder::PipelineEvent;
use cmakegen::core::module::to_forward_slashes;
use cmakegen::core::ModuleId;
use cmakegen::ops::{analyze, AnalysisReport};
use cmakegen::resolver::ModuleOrder;
use cmakegen::util::diagnostic::format_cycle;
use cmakegen::util::shell::Status;
use cmakegen::util::{GlobalContext, Shell};

pub fn execute(args: AnalyzeArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let root = project_root(&ctx, args.path.as_deref())?;
    let config = ctx.load_config(&root);

    let mut progress = None;
    let analysis = analyze(&root, &config, args.name, file_progress(shell, &mut progress))?;
    if let Some(progress) = &progress {
        progress.finish();
    }
    let report = AnalysisReport::new(&analysis);
    let model = &analysis.model;

    if shell.is_json() {
        shell.event(&PipelineEvent::ScanFinished {
            project: report.project.clone(),
            root: model.root().to_path_buf(),
            source_files: model.source_count(),
            header_files: model.header_count(),
            modules: model.module_count(),
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
        model.source_count(),
        model.header_count(),
        model.module_count(),
    );
    shell.status(
        Status::Resolving,
        format!(
            "{} file edges, {} module edges",
            analysis.graph.file_edge_count(),
            analysis.graph.module_edge_count()
        ),
    );

    println!("File dependencies:");
    for file in &report.files {
        println!("  {}", to_forward_slashes(&file.file));
        for include in &file.includes {
            println!("    -> {}", to_forward_slashes(include));
        }
    }

    println!();
    println!("Module graph:");
    for module in &report.modules {
        if module.dependencies.is_empty() {
            println!("  {} (no dependencies)", module.id);
        } else {
            println!("  {} -> {}", module.id, join(&module.dependencies));
        }
        if module.transitive.len() > module.dependencies.len() {
            println!("      transitive: {}", join(&module.transitive));
        }
    }

    println!();
    println!("Build order:");
    for (i, id) in report.order.order().iter().enumerate() {
        println!("  {}. {}", i + 1, id);
    }
    if let ModuleOrder::Cyclic {
        cycles,
        broken_edges,
        ..
    } = &report.order
    {
        for cycle in cycles {
            println!("  cycle: {}", format_cycle(cycle));
        }
        for edge in broken_edges {
            println!("  ignored edge: {} -> {}", edge.from, edge.to);
        }
    }

    if !report.warnings.is_empty() {
        println!();
    }
    for warning in &report.warnings {
        shell.warning(warning);
    }

    Ok(())
}

fn join(ids: &[ModuleId]) -> String {
    ids.iter()
        .map(ModuleId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
