//! High-level operations.
//!
//! This module contains the implementation of cmakegen commands. Operations
//! never print; they return reports for the binary to render.

pub mod cmakegen_analyze;
pub mod cmakegen_build;
pub mod cmakegen_generate;
pub mod cmakegen_scan;

pub use cmakegen_analyze::{analyze, Analysis, AnalysisReport};
pub use cmakegen_build::{build, BuildOptions, BuildResult};
pub use cmakegen_generate::{generate, GenerateOptions, GenerationReport};
pub use cmakegen_scan::{scan, ScanReport};
