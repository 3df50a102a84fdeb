//! User-facing diagnostics.
//!
//! Only [`ScanError`] stops a run. Every other problem the pipeline detects
//! is a [`Warning`] that is accumulated and handed back to the caller, which
//! decides how to present it.

use std::fmt;
use std::path::{Path, PathBuf};

use miette::Diagnostic as MietteDiagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::core::ModuleId;

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
            Severity::Note => "\x1b[1;36m",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A message rendered for the terminal in the compiler style:
///
/// ```text
/// warning: ambiguous include "util.h" in `src/a.c:3` matches 2 headers; using `src/util.h`
///   --> src/a.c
///    = note: candidate: lib/util.h
///    = help: include the header by its path relative to the includer
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<PathBuf>,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            location: None,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn at(mut self, path: Option<&Path>) -> Self {
        self.location = path.map(Path::to_path_buf);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render with a trailing newline; `color` adds ANSI codes to the
    /// severity label.
    pub fn format(&self, color: bool) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.render(&mut out, color);
        out
    }

    fn render(&self, out: &mut impl fmt::Write, color: bool) -> fmt::Result {
        if color {
            write!(out, "{}{}\x1b[0m", self.severity.ansi(), self.severity)?;
        } else {
            write!(out, "{}", self.severity)?;
        }
        writeln!(out, ": {}", self.message)?;

        if let Some(path) = &self.location {
            writeln!(out, "  --> {}", path.display())?;
        }
        for note in &self.notes {
            writeln!(out, "   = note: {}", note)?;
        }
        if let Some(help) = &self.help {
            writeln!(out, "   = help: {}", help)?;
        }
        Ok(())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

/// Fatal input error. Aborts the scan.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ScanError {
    #[error("project root `{}` does not exist", .0.display())]
    #[diagnostic(
        code(cmakegen::scan::root_not_found),
        help("pass the directory that contains your sources")
    )]
    RootNotFound(PathBuf),

    #[error("project root `{}` is not a directory", .0.display())]
    #[diagnostic(
        code(cmakegen::scan::root_not_directory),
        help("pass the directory that contains the file, not the file itself")
    )]
    RootNotDirectory(PathBuf),

    #[error("invalid exclude pattern `{pattern}`: {reason}")]
    #[diagnostic(
        code(cmakegen::scan::bad_exclude),
        help("exclude patterns use glob syntax and match directory names")
    )]
    InvalidExcludePattern { pattern: String, reason: String },
}

/// A non-fatal condition detected during a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Warning {
    #[error("could not read directory `{}`: {reason}", .path.display())]
    UnreadableDirectory { path: PathBuf, reason: String },

    #[error("could not read file `{}`: {reason}", .path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("unresolved include \"{token}\" in `{}:{line}`", .file.display())]
    UnresolvedInclude {
        file: PathBuf,
        line: usize,
        token: String,
    },

    #[error(
        "ambiguous include \"{token}\" in `{}:{line}` matches {} headers; using `{}`",
        .file.display(),
        .candidates.len(),
        .chosen.display()
    )]
    AmbiguousInclude {
        file: PathBuf,
        line: usize,
        token: String,
        chosen: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("circular module dependency: {}", format_cycle(.cycle))]
    ModuleCycle { cycle: Vec<ModuleId> },

    #[error("module `{dependent}` includes headers of executable module `{executable}`; it will not be linked")]
    ExecutableDependency {
        dependent: ModuleId,
        executable: ModuleId,
    },

    #[error("no entry point found; no executable target will be declared")]
    NoEntryPoint,

    #[error("`{}` already exists, skipped", .path.display())]
    OutputExists { module: ModuleId, path: PathBuf },
}

impl Warning {
    /// Severity of this condition. Only the missing entry point is informational.
    pub fn severity(&self) -> Severity {
        match self {
            Warning::NoEntryPoint => Severity::Note,
            _ => Severity::Warning,
        }
    }

    /// File or directory the warning is about, if any.
    pub fn location(&self) -> Option<&Path> {
        match self {
            Warning::UnreadableDirectory { path, .. }
            | Warning::UnreadableFile { path, .. }
            | Warning::OutputExists { path, .. } => Some(path),
            Warning::UnresolvedInclude { file, .. } | Warning::AmbiguousInclude { file, .. } => {
                Some(file)
            }
            Warning::ModuleCycle { .. }
            | Warning::ExecutableDependency { .. }
            | Warning::NoEntryPoint => None,
        }
    }

    /// The terminal rendering of this warning.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::new(self.severity(), self.to_string()).at(self.location());

        match self {
            Warning::AmbiguousInclude { candidates, .. } => candidates
                .iter()
                .fold(diag, |d, c| d.note(format!("candidate: {}", c.display())))
                .help("include the header by its path relative to the includer"),
            Warning::UnresolvedInclude { .. } => {
                diag.help("use angle brackets for headers that live outside the project")
            }
            Warning::ModuleCycle { .. } => diag
                .note("the generated link order is a best effort")
                .help("move the shared declarations into one module"),
            Warning::OutputExists { .. } => {
                diag.help("run `cmakegen generate --force` to overwrite existing files")
            }
            _ => diag,
        }
    }
}

/// Render a cycle as `a → b → a`.
pub fn format_cycle(cycle: &[ModuleId]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(|m| m.as_str()).collect();
    if let Some(first) = cycle.first() {
        parts.push(first.as_str());
    }
    parts.join(" → ")
}
