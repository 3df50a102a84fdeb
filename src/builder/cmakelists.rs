//! `CMakeLists.txt` rendering and writing.
//!
//! Rendering is deterministic: the same plan always produces the same
//! bytes, so regenerating an unchanged project is a no-op for CMake.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::plan::{BuildPlan, TargetPlan};
use crate::core::{ModuleId, TargetKind};
use crate::util::fs::write_atomic;

/// File name of every generated document.
pub const CMAKELISTS: &str = "CMakeLists.txt";

/// A rendered document, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Module the document belongs to; the root document uses the root id
    pub module: ModuleId,
    /// Destination, relative to the project root
    pub rel_path: PathBuf,
    pub contents: String,
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DocumentOutcome {
    Written,
    /// The file existed and overwriting was not requested
    Skipped,
    Failed { reason: String },
}

/// Outcome of writing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentResult {
    pub module: ModuleId,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
}

/// Render the root document followed by one document per non-root module,
/// in build order.
pub fn render_documents(plan: &BuildPlan) -> Vec<Document> {
    let mut docs = Vec::with_capacity(plan.targets.len() + 1);
    docs.push(Document {
        module: ModuleId::root(),
        rel_path: PathBuf::from(CMAKELISTS),
        contents: render_root_document(plan),
    });

    for target in plan.targets.iter().filter(|t| !t.module.is_root()) {
        docs.push(Document {
            module: target.module.clone(),
            rel_path: target.module.rel_dir().join(CMAKELISTS),
            contents: render_module_document(target),
        });
    }

    docs
}

/// The root document: project settings, then every module in build order.
pub fn render_root_document(plan: &BuildPlan) -> String {
    let settings = &plan.settings;
    let mut out = String::new();

    let languages: Vec<&str> = plan.languages.iter().map(|l| l.cmake_name()).collect();
    let _ = writeln!(out, "cmake_minimum_required(VERSION {})", settings.min_version);
    let _ = writeln!(
        out,
        "project({} LANGUAGES {})",
        quote_arg(&settings.project_name),
        languages.join(" ")
    );
    out.push('\n');

    let _ = writeln!(out, "set(CMAKE_CXX_STANDARD {})", settings.cpp_standard.cmake_value());
    let _ = writeln!(out, "set(CMAKE_CXX_STANDARD_REQUIRED {})", on_off(settings.cxx_required));
    let _ = writeln!(out, "set(CMAKE_CXX_EXTENSIONS {})", on_off(settings.cxx_extensions));
    if let Some(c_standard) = settings.c_standard {
        let _ = writeln!(out, "set(CMAKE_C_STANDARD {})", c_standard.cmake_value());
    }

    if !plan.targets.is_empty() {
        out.push('\n');
    }
    for target in &plan.targets {
        if target.module.is_root() {
            out.push('\n');
            render_target(&mut out, target);
            out.push('\n');
        } else {
            let _ = writeln!(out, "add_subdirectory({})", quote_arg(target.module.as_str()));
        }
    }

    tidy(out)
}

/// The document of a non-root module.
pub fn render_module_document(target: &TargetPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", target.module);
    out.push('\n');
    render_target(&mut out, target);
    tidy(out)
}

fn render_target(out: &mut String, target: &TargetPlan) {
    let name = &target.name;
    let scope = target.kind.usage_scope();

    match target.kind {
        TargetKind::Executable => {
            write_list(out, &format!("add_executable({name}"), target_files(target));
        }
        TargetKind::StaticLib => {
            write_list(out, &format!("add_library({name} STATIC"), target_files(target));
        }
        TargetKind::SharedLib => {
            write_list(out, &format!("add_library({name} SHARED"), target_files(target));
        }
        TargetKind::Interface => {
            let _ = writeln!(out, "add_library({name} INTERFACE)");
        }
    }

    if target.kind != TargetKind::Interface && !target.headers.is_empty() {
        write_list(out, "source_group(\"Header Files\" FILES", target.headers.iter().cloned());
    }

    let include_dirs = ["${CMAKE_CURRENT_SOURCE_DIR}", "${PROJECT_SOURCE_DIR}"]
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    write_list(
        out,
        &format!("target_include_directories({name} {scope}"),
        include_dirs.into_iter(),
    );

    if !target.extra_include_dirs.is_empty() {
        let private = match target.kind {
            TargetKind::Interface => "INTERFACE",
            _ => "PRIVATE",
        };
        write_list(
            out,
            &format!("target_include_directories({name} {private}"),
            target.extra_include_dirs.iter().map(|dir| project_dir_arg(dir)),
        );
    }

    if !target.links.is_empty() {
        write_list(
            out,
            &format!("target_link_libraries({name} {scope}"),
            target.links.iter().cloned(),
        );
    }
}

fn target_files(target: &TargetPlan) -> impl Iterator<Item = String> + '_ {
    target
        .sources
        .iter()
        .chain(target.headers.iter())
        .map(|f| quote_arg(f))
}

/// `head` followed by one indented argument per line and a closing paren.
fn write_list(out: &mut String, head: &str, items: impl Iterator<Item = String>) {
    out.push_str(head);
    out.push('\n');
    for item in items {
        let _ = writeln!(out, "    {}", item);
    }
    out.push_str(")\n");
}

fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

/// Quote a CMake argument when it contains characters that would split or
/// reinterpret it.
pub fn quote_arg(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '"' | '\\' | '(' | ')' | '#' | ';' | '$'));
    if plain {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// `${PROJECT_SOURCE_DIR}/<dir>`, quoted when `dir` needs it. The variable
/// reference itself is never escaped.
fn project_dir_arg(dir: &str) -> String {
    let dir = quote_arg(dir);
    match dir.strip_prefix('"') {
        Some(rest) => format!("\"${{PROJECT_SOURCE_DIR}}/{rest}"),
        None => format!("${{PROJECT_SOURCE_DIR}}/{dir}"),
    }
}

/// Collapse blank-line runs and end with exactly one newline.
fn tidy(text: String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            if !blank && !out.is_empty() {
                out.push('\n');
            }
            blank = true;
        } else {
            out.push_str(line);
            out.push('\n');
            blank = false;
        }
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// Write one document below `root`.
///
/// An existing file is left untouched unless `force` is set.
pub fn write_document(root: &Path, doc: &Document, force: bool) -> DocumentOutcome {
    let path = root.join(&doc.rel_path);

    if path.exists() && !force {
        tracing::debug!("{} exists, skipping", doc.rel_path.display());
        return DocumentOutcome::Skipped;
    }

    match write_atomic(&path, &doc.contents) {
        Ok(()) => {
            tracing::debug!("wrote {}", doc.rel_path.display());
            DocumentOutcome::Written
        }
        Err(e) => {
            tracing::warn!("failed to write {}: {:#}", doc.rel_path.display(), e);
            DocumentOutcome::Failed {
                reason: format!("{:#}", e),
            }
        }
    }
}

/// Write every document independently; a failure does not stop the rest.
pub fn write_documents(root: &Path, docs: &[Document], force: bool) -> Vec<DocumentResult> {
    docs.iter()
        .map(|doc| DocumentResult {
            module: doc.module.clone(),
            path: doc.rel_path.clone(),
            outcome: write_document(root, doc, force),
        })
        .collect()
}
