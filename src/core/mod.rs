//! Core data structures for cmakegen.
//!
//! This module contains the project model the rest of the pipeline works on:
//! - File classification (source / header / other)
//! - Modules and their identifiers
//! - The project model built by a scan
//! - Target kinds and language standards

pub mod file_kind;
pub mod language;
pub mod module;
pub mod project;
pub mod target;

pub use file_kind::{classify, FileClassifier, FileRole};
pub use language::{CStandard, CppStandard, Language};
pub use module::{FileEntry, Module, ModuleId};
pub use project::ProjectModel;
pub use target::{LibraryType, TargetKind};
