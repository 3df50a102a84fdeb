//! CMake driver for generated projects.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::cmakelists::CMAKELISTS;
use crate::util::config::Config;
use crate::util::fs::ensure_dir;
use crate::util::process::{find_cmake, find_tool, ProcessBuilder};

/// Default build directory, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Configures and builds a project with CMake.
pub struct CMakeBuilder {
    cmake: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    build_type: String,
    generator: Option<String>,
    cmake_args: Vec<String>,
}

impl CMakeBuilder {
    /// Create a builder for `source_dir`, taking generator, build type and
    /// compilers from `config`.
    pub fn new(config: &Config, source_dir: PathBuf) -> Result<Self> {
        let toolchain_root = config.paths.toolchain_root.as_deref();
        let Some(cmake) = find_cmake(toolchain_root) else {
            bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to build the generated project.\n\
                 Install CMake and ensure it's in your PATH."
            );
        };

        let mut cmake_args = Vec::new();
        for (var, tool) in [
            ("CMAKE_C_COMPILER", &config.compilers.c_compiler),
            ("CMAKE_CXX_COMPILER", &config.compilers.cxx_compiler),
            ("CMAKE_MAKE_PROGRAM", &config.compilers.make_program),
        ] {
            let Some(tool) = tool.as_deref() else {
                continue;
            };
            let path = find_tool(tool, toolchain_root).with_context(|| {
                format!("`{}` not found (configured for {})", tool, var)
            })?;
            cmake_args.push(format!("-D{}={}", var, path.display()));
        }

        let build_dir = source_dir.join(DEFAULT_BUILD_DIR);

        Ok(CMakeBuilder {
            cmake,
            source_dir,
            build_dir,
            build_type: config.build_type().to_string(),
            generator: config.generator().map(str::to_string),
            cmake_args,
        })
    }

    /// Set the build directory.
    pub fn build_dir(mut self, dir: PathBuf) -> Self {
        self.build_dir = dir;
        self
    }

    pub fn get_build_type(&self) -> &str {
        &self.build_type
    }

    /// Configure and build.
    pub fn build(&self) -> Result<()> {
        if !is_cmake_project(&self.source_dir) {
            bail!(
                "no {} in {}\nrun `cmakegen generate {}` first",
                CMAKELISTS,
                self.source_dir.display(),
                self.source_dir.display()
            );
        }

        ensure_dir(&self.build_dir)?;
        self.configure()?;
        self.compile()
    }

    /// The configure command line.
    pub fn configure_command(&self) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.cmake)
            .arg("-S")
            .arg(&self.source_dir)
            .arg("-B")
            .arg(&self.build_dir);

        if let Some(generator) = &self.generator {
            cmd = cmd.arg("-G").arg(generator);
        }

        cmd = cmd.arg(format!("-DCMAKE_BUILD_TYPE={}", self.build_type));
        cmd.args(&self.cmake_args)
    }

    /// The build command line.
    pub fn build_command(&self) -> ProcessBuilder {
        // --config matters for multi-config generators like Visual Studio
        ProcessBuilder::new(&self.cmake)
            .arg("--build")
            .arg(&self.build_dir)
            .arg("--parallel")
            .arg("--config")
            .arg(&self.build_type)
    }

    fn configure(&self) -> Result<()> {
        tracing::info!("configuring {}", self.source_dir.display());
        self.configure_command().exec_checked("CMake configuration")?;
        Ok(())
    }

    fn compile(&self) -> Result<()> {
        tracing::info!("building {}", self.build_dir.display());
        self.build_command().exec_checked("CMake build")?;
        Ok(())
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join(CMAKELISTS).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_cmake_project() {
        let tmp = TempDir::new().unwrap();

        assert!(!is_cmake_project(tmp.path()));

        std::fs::write(tmp.path().join(CMAKELISTS), "cmake_minimum_required(VERSION 3.10)").unwrap();

        assert!(is_cmake_project(tmp.path()));
    }

    #[test]
    fn test_command_lines() {
        let builder = CMakeBuilder {
            cmake: PathBuf::from("cmake"),
            source_dir: PathBuf::from("proj"),
            build_dir: PathBuf::from("proj/out"),
            build_type: "Debug".to_string(),
            generator: Some("Ninja".to_string()),
            cmake_args: vec!["-DCMAKE_C_COMPILER=/usr/bin/gcc".to_string()],
        };

        assert_eq!(
            builder.configure_command().get_args().collect::<Vec<_>>(),
            [
                "-S",
                "proj",
                "-B",
                "proj/out",
                "-G",
                "Ninja",
                "-DCMAKE_BUILD_TYPE=Debug",
                "-DCMAKE_C_COMPILER=/usr/bin/gcc",
            ]
        );
        assert_eq!(
            builder.build_command().display_command(),
            "cmake --build proj/out --parallel --config Debug"
        );
    }

    #[test]
    fn test_missing_configured_compiler() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.compilers.c_compiler = Some(tmp.path().join("bin").join("nope-cc").display().to_string());

        // Only meaningful where cmake itself is available
        if find_cmake(None).is_some() {
            let err = CMakeBuilder::new(&config, tmp.path().to_path_buf()).err().unwrap();
            assert!(err.to_string().contains("CMAKE_C_COMPILER"));
        }
    }
}
