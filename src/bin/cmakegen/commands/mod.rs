//! Command implementations

pub mod analyze;
pub mod build;
pub mod completions;
pub mod config;
pub mod generate;
pub mod scan;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use cmakegen::core::FileEntry;
use cmakegen::util::shell::{Progress, Status};
use cmakegen::util::{GlobalContext, Shell};

/// Absolute project root for an optional path argument.
pub fn project_root(ctx: &GlobalContext, path: Option<&Path>) -> Result<PathBuf> {
    let root = path.map_or_else(|| ctx.cwd().to_path_buf(), |p| ctx.resolve_path(p));
    if !root.exists() {
        return Ok(root);
    }
    root.canonicalize()
        .with_context(|| format!("failed to resolve {}", root.display()))
}

/// A file callback driving a progress bar that is created once the total
/// is known.
pub fn file_progress<'a>(
    shell: &Arc<Shell>,
    progress: &'a mut Option<Progress>,
) -> impl FnMut(&FileEntry, usize, usize) + 'a {
    let shell = Arc::clone(shell);
    move |file, _current, total| {
        progress
            .get_or_insert_with(|| shell.progress(total as u64, "Parsing"))
            .inc(1, file.display_path());
    }
}

/// Print the scan headline shared by every pipeline command.
pub fn scan_status(shell: &Shell, project: &str, sources: usize, headers: usize, modules: usize) {
    shell.status(
        Status::Scanning,
        format!(
            "{} ({} source files, {} header files, {} modules)",
            project, sources, headers, modules
        ),
    );
}
