//! Global context for cmakegen operations.
//!
//! Provides centralized access to the working directory and the
//! configuration locations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{self, Config};

/// Environment variable overriding the global cmakegen directory.
pub const HOME_ENV: &str = "CMAKEGEN_HOME";

/// Global context containing paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global cmakegen data (~/.cmakegen/)
    home: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process environment.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = std::env::var_os(HOME_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(config::global_config_dir);

        Ok(GlobalContext { cwd, home })
    }

    /// Create a context with explicit paths.
    pub fn with_paths(cwd: PathBuf, home: Option<PathBuf>) -> Self {
        GlobalContext { cwd, home }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Global cmakegen directory, if a home directory could be determined.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Global config path (`<home>/config.toml`).
    pub fn config_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join("config.toml"))
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Load global and project configuration for `project_root`.
    pub fn load_config(&self, project_root: &Path) -> Config {
        let global = self.config_path();
        config::load_config(global.as_deref(), &config::project_config_path(project_root))
    }
}
