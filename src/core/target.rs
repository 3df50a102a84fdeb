//! Target kinds - what a module's document declares.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of target declared for a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Executable binary
    #[serde(alias = "exe", alias = "bin")]
    Executable,

    /// Static library (.a / .lib)
    #[serde(alias = "static", alias = "staticlib")]
    StaticLib,

    /// Shared library (.so / .dylib / .dll)
    #[serde(alias = "shared", alias = "dylib")]
    SharedLib,

    /// Header-only library (no compile/link steps)
    #[serde(alias = "header-only", alias = "interface")]
    Interface,
}

impl TargetKind {
    /// Check if this is a library of any kind.
    pub fn is_library(&self) -> bool {
        !matches!(self, TargetKind::Executable)
    }

    /// Check if other targets can link against this one.
    pub fn is_linkable(&self) -> bool {
        self.is_library()
    }

    /// Keyword used in `target_*` commands for usage requirements.
    pub fn usage_scope(&self) -> &'static str {
        match self {
            TargetKind::Interface => "INTERFACE",
            TargetKind::Executable => "PRIVATE",
            TargetKind::StaticLib | TargetKind::SharedLib => "PUBLIC",
        }
    }

    /// Short human name for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Executable => "executable",
            TargetKind::StaticLib => "static library",
            TargetKind::SharedLib => "shared library",
            TargetKind::Interface => "interface library",
        }
    }
}

/// Linkage used for modules that become compiled libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryType {
    #[default]
    Static,
    Shared,
}

impl LibraryType {
    pub fn target_kind(&self) -> TargetKind {
        match self {
            LibraryType::Static => TargetKind::StaticLib,
            LibraryType::Shared => TargetKind::SharedLib,
        }
    }
}

impl std::str::FromStr for LibraryType {
    type Err = LibraryTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(LibraryType::Static),
            "shared" | "dynamic" => Ok(LibraryType::Shared),
            _ => Err(LibraryTypeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid library type.
#[derive(Debug, Clone, Error)]
#[error("invalid library type '{0}', valid values: static, shared")]
pub struct LibraryTypeParseError(pub String);
