//! Test utilities for cmakegen unit tests.
//!
//! [`ProjectFixture`] materializes a source tree in a temporary directory:
//!
//! ```rust,ignore
//! let fixture = ProjectFixture::new()
//!     .file("main.cpp", "int main() {}")
//!     .file("util/log.h", "void log(const char*);");
//! let result = ModuleScanner::new(fixture.path()).scan()?;
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub use fixtures::*;

/// A throwaway project tree. Dropping it removes the directory.
#[derive(Debug)]
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Create an empty project directory.
    pub fn new() -> Self {
        ProjectFixture {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Write a file (parent directories are created).
    pub fn file(self, rel: impl AsRef<Path>, contents: &str) -> Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture dir");
        }
        std::fs::write(&path, contents).expect("failed to write fixture file");
        self
    }

    /// Create an empty directory.
    pub fn dir(self, rel: impl AsRef<Path>) -> Self {
        std::fs::create_dir_all(self.dir.path().join(rel)).expect("failed to create fixture dir");
        self
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a file inside the project.
    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Read a file inside the project.
    pub fn read(&self, rel: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.join(rel)).expect("failed to read fixture file")
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
