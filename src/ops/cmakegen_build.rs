//! Implementation of `cmakegen build`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};

use crate::builder::cmake::{is_cmake_project, DEFAULT_BUILD_DIR};
use crate::builder::{CMakeBuilder, CMAKELISTS};
use crate::util::config::Config;
use crate::util::fs::remove_dir_all_if_exists;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Remove the build directory first
    pub clean: bool,

    /// Build directory (default: `<root>/build`); relative paths are taken
    /// from the project root
    pub build_dir: Option<PathBuf>,
}

impl BuildOptions {
    /// The build directory for a project at `root`.
    pub fn build_dir_for(&self, root: &Path) -> PathBuf {
        match &self.build_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => root.join(dir),
            None => root.join(DEFAULT_BUILD_DIR),
        }
    }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub build_dir: PathBuf,
    pub build_type: String,
    pub elapsed: Duration,
}

/// Configure and build the generated project at `root` with CMake.
pub fn build(root: &Path, config: &Config, opts: &BuildOptions) -> Result<BuildResult> {
    if !is_cmake_project(root) {
        bail!(
            "no {} in {}\nrun `cmakegen generate {}` first",
            CMAKELISTS,
            root.display(),
            root.display()
        );
    }

    let build_dir = opts.build_dir_for(root);
    if opts.clean {
        tracing::info!("removing {}", build_dir.display());
        remove_dir_all_if_exists(&build_dir)?;
    }

    let builder = CMakeBuilder::new(config, root.to_path_buf())?.build_dir(build_dir.clone());
    let start = Instant::now();
    builder.build()?;

    Ok(BuildResult {
        build_dir,
        build_type: builder.get_build_type().to_string(),
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_dir_resolution() {
        let root = Path::new("/proj");
        assert_eq!(BuildOptions::default().build_dir_for(root), root.join("build"));

        let relative = BuildOptions {
            build_dir: Some(PathBuf::from("out/debug")),
            ..Default::default()
        };
        assert_eq!(relative.build_dir_for(root), root.join("out/debug"));

        let tmp = TempDir::new().unwrap();
        let absolute = BuildOptions {
            build_dir: Some(tmp.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(absolute.build_dir_for(root), tmp.path());
    }

    #[test]
    fn test_build_requires_generated_project() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("build")).unwrap();

        let opts = BuildOptions {
            clean: true,
            ..Default::default()
        };
        let err = build(tmp.path(), &Config::default(), &opts).unwrap_err();
        assert!(err.to_string().contains("cmakegen generate"));
        // nothing is removed before the project is validated
        assert!(tmp.path().join("build").exists());
    }
}
