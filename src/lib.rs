//! cmakegen - CMakeLists.txt generation for existing C/C++ source trees
//!
//! This crate provides the library behind the `cmakegen` binary: scanning a
//! tree into modules, resolving `#include` directives into a module graph,
//! and rendering one `CMakeLists.txt` per module plus a root document.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Temporary project trees for unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::{FileEntry, Module, ModuleId, ProjectModel};
pub use resolver::{DependencyGraph, ModuleOrder};
pub use util::context::GlobalContext;
