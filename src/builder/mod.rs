//! Build-file generation.
//!
//! This module turns a resolved project model into `CMakeLists.txt`
//! documents and drives CMake over the result.

pub mod cmake;
pub mod cmakelists;
pub mod events;
pub mod plan;

pub use cmake::CMakeBuilder;
pub use cmakelists::{
    render_documents, write_documents, Document, DocumentOutcome, DocumentResult, CMAKELISTS,
};
pub use events::PipelineEvent;
pub use plan::{BuildPlan, GeneratorSettings, TargetPlan};
