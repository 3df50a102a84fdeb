//! Configuration file support for cmakegen.
//!
//! cmakegen supports two configuration file locations:
//! - Global: `~/.cmakegen/config.toml` - User-wide defaults
//! - Project: `<project>/.cmakegen/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Every field is
//! optional; the accessors on [`Config`] supply the defaults.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use toml_edit::{value, Array, DocumentMut, Item, Table};

use crate::core::{CStandard, CppStandard, LibraryType};

/// Default minimum CMake version written into the root document.
pub const DEFAULT_MIN_VERSION: &str = "3.10";

/// Default CMake build type.
pub const DEFAULT_BUILD_TYPE: &str = "Release";

/// Directory names skipped by the scanner unless configured otherwise.
pub const DEFAULT_EXCLUDES: &[&str] = &[".*", "build", "build-*", "cmake-build-*", "CMakeFiles", "out"];

/// cmakegen configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CMake settings
    pub cmake: CMakeConfig,

    /// Compiler overrides
    pub compilers: CompilerConfig,

    /// Toolchain paths
    pub paths: PathsConfig,

    /// Project-wide language settings
    pub project: ProjectConfig,

    /// Scanner settings
    pub scan: ScanConfig,
}

/// CMake-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CMakeConfig {
    /// Minimum CMake version (default: 3.10)
    pub min_version: Option<String>,

    /// Generator backend passed with `-G` (default: CMake's own choice)
    pub generator: Option<String>,

    /// Build type passed as `CMAKE_BUILD_TYPE` (default: Release)
    pub build_type: Option<String>,
}

/// Compiler overrides passed to CMake at configure time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// C compiler name or path (e.g., gcc)
    pub c_compiler: Option<String>,

    /// C++ compiler name or path (e.g., g++)
    pub cxx_compiler: Option<String>,

    /// Make program name or path (e.g., mingw32-make)
    pub make_program: Option<String>,
}

/// Toolchain location settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of a toolchain installation; its `bin` directory is searched first
    pub toolchain_root: Option<PathBuf>,
}

/// Language settings written into the root document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// C++ standard (default: 11)
    pub cpp_standard: Option<String>,

    /// C standard (default: unset, CMake decides)
    pub c_standard: Option<String>,

    /// `CMAKE_CXX_STANDARD_REQUIRED` (default: true)
    pub cxx_required: Option<bool>,

    /// `CMAKE_CXX_EXTENSIONS` (default: false)
    pub cxx_extensions: Option<bool>,

    /// Library linkage for module targets (default: static)
    pub library_type: Option<String>,
}

/// Scanner settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Glob patterns for directory names to skip (default: [`DEFAULT_EXCLUDES`])
    pub exclude: Option<Vec<String>>,

    /// Extra source extensions
    #[serde(default)]
    pub source_extensions: Vec<String>,

    /// Extra header extensions
    #[serde(default)]
    pub header_extensions: Vec<String>,
}

impl Config {
    /// Read and parse one config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = crate::util::fs::read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Like [`Config::load`], but a missing or broken file yields an empty
    /// config. Broken files are logged.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.is_file() {
            return Config::default();
        }
        match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring {}: {:#}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Write as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize config")?;

        crate::util::fs::write_string(path, &contents)
    }

    /// Overlay every field `other` sets onto `self`.
    pub fn merge(&mut self, other: Config) {
        fn take<T>(slot: &mut Option<T>, other: Option<T>) {
            if other.is_some() {
                *slot = other;
            }
        }

        take(&mut self.cmake.min_version, other.cmake.min_version);
        take(&mut self.cmake.generator, other.cmake.generator);
        take(&mut self.cmake.build_type, other.cmake.build_type);

        take(&mut self.compilers.c_compiler, other.compilers.c_compiler);
        take(&mut self.compilers.cxx_compiler, other.compilers.cxx_compiler);
        take(&mut self.compilers.make_program, other.compilers.make_program);

        take(&mut self.paths.toolchain_root, other.paths.toolchain_root);

        take(&mut self.project.cpp_standard, other.project.cpp_standard);
        take(&mut self.project.c_standard, other.project.c_standard);
        take(&mut self.project.cxx_required, other.project.cxx_required);
        take(&mut self.project.cxx_extensions, other.project.cxx_extensions);
        take(&mut self.project.library_type, other.project.library_type);

        take(&mut self.scan.exclude, other.scan.exclude);
        if !other.scan.source_extensions.is_empty() {
            self.scan.source_extensions = other.scan.source_extensions;
        }
        if !other.scan.header_extensions.is_empty() {
            self.scan.header_extensions = other.scan.header_extensions;
        }
    }

    /// A config with every default spelled out, as written by `config init`.
    pub fn with_defaults() -> Self {
        Config {
            cmake: CMakeConfig {
                min_version: Some(DEFAULT_MIN_VERSION.to_string()),
                generator: None,
                build_type: Some(DEFAULT_BUILD_TYPE.to_string()),
            },
            compilers: CompilerConfig::default(),
            paths: PathsConfig::default(),
            project: ProjectConfig {
                cpp_standard: Some(CppStandard::default().cmake_value().to_string()),
                c_standard: None,
                cxx_required: Some(true),
                cxx_extensions: Some(false),
                library_type: Some("static".to_string()),
            },
            scan: ScanConfig {
                exclude: Some(DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()),
                source_extensions: Vec::new(),
                header_extensions: Vec::new(),
            },
        }
    }

    pub fn min_version(&self) -> &str {
        self.cmake
            .min_version
            .as_deref()
            .unwrap_or(DEFAULT_MIN_VERSION)
    }

    pub fn build_type(&self) -> &str {
        self.cmake.build_type.as_deref().unwrap_or(DEFAULT_BUILD_TYPE)
    }

    pub fn generator(&self) -> Option<&str> {
        self.cmake.generator.as_deref().filter(|g| !g.is_empty())
    }

    /// Parse the configured C++ standard.
    pub fn cpp_standard(&self) -> Result<CppStandard> {
        match self.project.cpp_standard.as_deref() {
            Some(s) => s.parse().with_context(|| "invalid `project.cpp_standard`"),
            None => Ok(CppStandard::default()),
        }
    }

    /// Parse the configured C standard, if any.
    pub fn c_standard(&self) -> Result<Option<CStandard>> {
        self.project
            .c_standard
            .as_deref()
            .map(|s| s.parse::<CStandard>())
            .transpose()
            .with_context(|| "invalid `project.c_standard`")
    }

    pub fn cxx_required(&self) -> bool {
        self.project.cxx_required.unwrap_or(true)
    }

    pub fn cxx_extensions(&self) -> bool {
        self.project.cxx_extensions.unwrap_or(false)
    }

    /// Parse the configured library type.
    pub fn library_type(&self) -> Result<LibraryType> {
        match self.project.library_type.as_deref() {
            Some(s) => s.parse().with_context(|| "invalid `project.library_type`"),
            None => Ok(LibraryType::default()),
        }
    }

    /// Directory-name patterns the scanner skips.
    pub fn exclude_patterns(&self) -> Vec<String> {
        match &self.scan.exclude {
            Some(patterns) => patterns.clone(),
            None => DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The effective config for a project: project file over global file
/// over built-in defaults.
pub fn load_config(global: Option<&Path>, project: &Path) -> Config {
    global
        .into_iter()
        .chain(std::iter::once(project))
        .fold(Config::default(), |mut config, path| {
            config.merge(Config::load_or_default(path));
            config
        })
}

/// `~/.cmakegen`
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".cmakegen"))
}

/// `<project>/.cmakegen/config.toml`
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".cmakegen").join("config.toml")
}

/// Keys accepted by [`set_config_value`].
pub const SETTABLE_KEYS: &[&str] = &[
    "cmake.min_version",
    "cmake.generator",
    "cmake.build_type",
    "compilers.c_compiler",
    "compilers.cxx_compiler",
    "compilers.make_program",
    "paths.toolchain_root",
    "project.cpp_standard",
    "project.c_standard",
    "project.cxx_required",
    "project.cxx_extensions",
    "project.library_type",
    "scan.exclude",
    "scan.source_extensions",
    "scan.header_extensions",
];

/// Set a single dotted key in a config file, keeping the rest of the file intact.
///
/// The value is validated before anything is written. List keys take a
/// comma-separated value.
pub fn set_config_value(path: &Path, key: &str, raw: &str) -> Result<()> {
    let Some((section, field)) = key.split_once('.') else {
        bail!("invalid key `{}`; expected `section.field`", key);
    };
    if !SETTABLE_KEYS.contains(&key) {
        bail!(
            "unknown config key `{}`\navailable keys: {}",
            key,
            SETTABLE_KEYS.join(", ")
        );
    }

    let item = match key {
        "project.cpp_standard" => {
            raw.parse::<CppStandard>()?;
            value(raw)
        }
        "project.c_standard" => {
            raw.parse::<CStandard>()?;
            value(raw)
        }
        "project.library_type" => {
            raw.parse::<LibraryType>()?;
            value(raw.to_ascii_lowercase())
        }
        "project.cxx_required" | "project.cxx_extensions" => {
            let flag = parse_bool(raw)
                .with_context(|| format!("`{}` expects true or false", key))?;
            value(flag)
        }
        "scan.exclude" | "scan.source_extensions" | "scan.header_extensions" => {
            let mut array = Array::new();
            for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                array.push(part);
            }
            value(array)
        }
        _ => value(raw),
    };

    let mut doc: DocumentMut = if path.exists() {
        crate::util::fs::read_to_string(path)?
            .parse()
            .with_context(|| format!("failed to parse config file: {}", path.display()))?
    } else {
        DocumentMut::new()
    };

    if !doc.contains_key(section) {
        doc[section] = Item::Table(Table::new());
    }
    doc[section][field] = item;

    crate::util::fs::write_string(path, &doc.to_string())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => bail!("invalid boolean `{}`", raw),
    }
}
