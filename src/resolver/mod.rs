//! Dependency resolution.
//!
//! Local includes are resolved to project headers, the resulting file
//! edges are folded into a module graph, and the module graph is ordered
//! so that every module comes after the modules it depends on. Cycles are
//! data, not errors: see [`ModuleOrder::Cyclic`].

pub mod graph;
pub mod include;
pub mod resolve;

pub use graph::{DependencyGraph, ModuleEdge, ModuleOrder};
pub use include::{parse_includes, IncludeEdge};
pub use resolve::{
    collect_includes, dedup_warnings, resolve_project, DependencyResolver, IncludeResolution,
    Resolution,
};
