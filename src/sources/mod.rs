//! Project sources.
//!
//! Discovering what a source tree contains: which files are compilable,
//! how they group into modules, and which modules define an entry point.

pub mod entry_point;
pub mod scan;

pub use entry_point::{EntryPointDetector, MainFunctionDetector};
pub use scan::{ModuleScanner, ScanResult};
