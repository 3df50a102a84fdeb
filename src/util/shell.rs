//! Terminal output for the cmakegen binary.
//!
//! All user-facing output goes through a [`Shell`]:
//! - status lines (`{status:>12} {message}`) and diagnostics on stderr
//! - reports and JSON events on stdout
//! - a progress bar while include directives are parsed
//!
//! In JSON mode nothing human-readable is printed; every line on stdout
//! is one JSON object.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::builder::events::PipelineEvent;
use crate::util::diagnostic::{Severity, Warning};

const STATUS_WIDTH: usize = 12;

/// How much human-readable output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    #[default]
    Normal,
    /// Per-file lines instead of a progress bar, notes in full
    Verbose,
}

/// Output mode. JSON excludes every human-readable line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    Human { verbosity: Verbosity, color: bool },
    Json,
}

/// The word in the status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Scanning,
    Resolving,
    Building,
    Generated,
    Created,
    Finished,
    Skipped,
    Info,
    Warning,
    Error,
}

impl Status {
    /// Label and ANSI colour.
    fn style(self) -> (&'static str, &'static str) {
        const GREEN: &str = "\x1b[1;32m";
        const CYAN: &str = "\x1b[1;36m";
        const BLUE: &str = "\x1b[1;34m";
        const YELLOW: &str = "\x1b[1;33m";
        const RED: &str = "\x1b[1;31m";

        match self {
            Status::Scanning => ("Scanning", CYAN),
            Status::Resolving => ("Resolving", CYAN),
            Status::Building => ("Building", CYAN),
            Status::Generated => ("Generated", GREEN),
            Status::Created => ("Created", GREEN),
            Status::Finished => ("Finished", GREEN),
            Status::Skipped => ("Skipped", YELLOW),
            Status::Info => ("Info", BLUE),
            Status::Warning => ("Warning", YELLOW),
            Status::Error => ("error", RED),
        }
    }
}

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    mode: ShellMode,
}

impl Shell {
    pub fn new(mode: ShellMode) -> Self {
        Shell { mode }
    }

    /// Build a shell from the global CLI flags.
    ///
    /// `--message-format json` wins over `--quiet` and `--verbose`; colour
    /// is used only when stderr is a terminal and `--no-color` is absent.
    pub fn from_flags(quiet: bool, verbose: bool, no_color: bool, json: bool) -> Self {
        if json {
            return Shell::new(ShellMode::Json);
        }

        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        let color = !no_color && io::stderr().is_terminal();
        Shell::new(ShellMode::Human { verbosity, color })
    }

    pub fn mode(&self) -> ShellMode {
        self.mode
    }

    pub fn is_json(&self) -> bool {
        self.mode == ShellMode::Json
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity() == Some(Verbosity::Quiet)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity() == Some(Verbosity::Verbose)
    }

    pub fn use_color(&self) -> bool {
        matches!(self.mode, ShellMode::Human { color: true, .. })
    }

    fn verbosity(&self) -> Option<Verbosity> {
        match self.mode {
            ShellMode::Human { verbosity, .. } => Some(verbosity),
            ShellMode::Json => None,
        }
    }

    /// Print `{status:>12} {msg}` to stderr.
    ///
    /// Quiet mode keeps only errors; JSON mode drops everything.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_json() || (self.is_quiet() && status != Status::Error) {
            return;
        }
        eprintln!("{} {}", self.status_label(status), msg);
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Print an error; in JSON mode this is an `error` event.
    pub fn error(&self, msg: impl Display) {
        if self.is_json() {
            self.print_json(&serde_json::json!({
                "reason": "error",
                "message": msg.to_string(),
            }));
        } else {
            self.status(Status::Error, msg);
        }
    }

    /// Report a non-fatal condition.
    ///
    /// Notes collapse to a single status line unless verbose; everything
    /// else is printed as a full diagnostic.
    pub fn warning(&self, warning: &Warning) {
        match self.verbosity() {
            None => self.event(&PipelineEvent::warning(warning)),
            Some(Verbosity::Quiet) => {}
            Some(verbosity) => {
                if warning.severity() == Severity::Note && verbosity != Verbosity::Verbose {
                    self.note(warning);
                } else {
                    eprint!("{}", warning.to_diagnostic().format(self.use_color()));
                }
            }
        }
    }

    /// Emit a pipeline event (JSON mode only).
    pub fn event(&self, event: &PipelineEvent) {
        if self.is_json() {
            self.print_json(event);
        }
    }

    /// Print `value` as one JSON line on stdout.
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => {
                let mut stdout = io::stdout().lock();
                let _ = writeln!(stdout, "{}", line);
                let _ = stdout.flush();
            }
            Err(e) => tracing::error!("failed to serialize JSON output: {}", e),
        }
    }

    fn status_label(&self, status: Status) -> String {
        let (label, color) = status.style();
        if self.use_color() {
            format!("{}{:>width$}\x1b[0m", color, label, width = STATUS_WIDTH)
        } else {
            format!("{:>width$}", label, width = STATUS_WIDTH)
        }
    }

    /// Print `msg` now; [`Span::finish_with_message`] prints the closing
    /// `Finished` line with the elapsed time.
    pub fn span(self: &Arc<Self>, status: Status, msg: impl Display) -> Span {
        self.status(status, msg);
        Span {
            shell: Arc::clone(self),
            start: Instant::now(),
        }
    }

    /// Progress over `total` items labelled `msg`.
    ///
    /// A bar is drawn only in normal mode on a terminal; verbose mode prints
    /// one line per item and JSON mode emits `progress` events.
    pub fn progress(self: &Arc<Self>, total: u64, msg: impl Display) -> Progress {
        let draw_bar = self.verbosity() == Some(Verbosity::Normal)
            && total > 1
            && io::stderr().is_terminal();

        let bar = draw_bar.then(|| {
            let bar = ProgressBar::new(total);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{msg:>12.cyan.bold} [{bar:40}] {pos}/{len}")
            {
                bar.set_style(style.progress_chars("=> "));
            }
            bar.set_message(msg.to_string());
            bar
        });

        Progress {
            shell: Arc::clone(self),
            bar,
            label: msg.to_string(),
            current: 0,
            total,
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::from_flags(false, false, false, false)
    }
}

/// A timed operation.
pub struct Span {
    shell: Arc<Shell>,
    start: Instant,
}

impl Span {
    pub fn finish_with_message(self, msg: impl Display) {
        let elapsed = format_duration(self.start.elapsed());
        self.shell
            .status(Status::Finished, format!("{} in {}", msg, elapsed));
    }
}

/// Progress over a known number of files.
pub struct Progress {
    shell: Arc<Shell>,
    bar: Option<ProgressBar>,
    label: String,
    current: u64,
    total: u64,
}

impl Progress {
    /// Advance by `delta`, naming the item just reached.
    pub fn inc(&mut self, delta: u64, item: impl Display) {
        self.current += delta;

        if let Some(bar) = &self.bar {
            bar.inc(delta);
        } else if self.shell.is_json() {
            self.shell.event(&PipelineEvent::Progress {
                current: self.current,
                total: self.total,
                unit: "files".to_string(),
                phase: Some(self.label.to_lowercase()),
            });
        } else if self.shell.is_verbose() {
            eprintln!(
                "{:>width$} [{}/{}] {}",
                self.label,
                self.current,
                self.total,
                item,
                width = STATUS_WIDTH
            );
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn position(&self) -> u64 {
        self.current
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 60.0 {
        format!("{:.1}m", secs / 60.0)
    } else {
        format!("{:.2}s", secs)
    }
}
