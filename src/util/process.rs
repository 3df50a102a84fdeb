//! Running external tools.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{bail, Context, Result};

/// A command line to run with captured output.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessBuilder {
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn get_args(&self) -> impl Iterator<Item = String> + '_ {
        self.args.iter().map(|a| a.to_string_lossy().into_owned())
    }

    /// Run with stdin closed, capturing stdout and stderr.
    pub fn exec(&self) -> Result<Output> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))
    }

    /// Run and fail with the tool's output when it exits unsuccessfully.
    ///
    /// `what` names the step in the error, e.g. "CMake configuration".
    pub fn exec_checked(&self, what: &str) -> Result<Output> {
        tracing::debug!("running `{}`", self.display_command());
        let output = self.exec()?;
        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} failed ({})\n{}{}",
                what,
                output.status,
                stdout,
                stderr
            );
        }
        Ok(output)
    }

    /// The command line as typed in a shell, for logs and errors.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.get_args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Locate a tool.
///
/// A name with a directory part is taken as a path and used if it is a
/// file. A bare name is looked up in `<toolchain_root>/bin` first, then on
/// `PATH`.
pub fn find_tool(name: &str, toolchain_root: Option<&Path>) -> Option<PathBuf> {
    let as_path = Path::new(name);
    if as_path.components().count() > 1 {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }

    let in_toolchain = toolchain_root.and_then(|root| {
        let bin = root.join("bin");
        which::which_in(name, Some(&bin), &bin).ok()
    });
    in_toolchain.or_else(|| which::which(name).ok())
}

pub fn find_cmake(toolchain_root: Option<&Path>) -> Option<PathBuf> {
    find_tool("cmake", toolchain_root)
}
