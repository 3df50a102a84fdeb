//! File classification by extension.
//!
//! Every path seen by the scanner is mapped to a [`FileRole`]. Only
//! sources and headers take part in the rest of the pipeline; anything
//! else is [`FileRole::Other`] and dropped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::language::Language;

/// Conventional C and C++ source extensions.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cpp", "cc", "cxx", "c++"];

/// Conventional C and C++ header extensions.
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hh", "hxx", "h++"];

/// Role of a file within the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    /// A translation unit
    Source(Language),
    /// An includable header
    Header,
    /// Anything else
    Other,
}

impl FileRole {
    pub fn is_source(&self) -> bool {
        matches!(self, FileRole::Source(_))
    }

    pub fn is_header(&self) -> bool {
        matches!(self, FileRole::Header)
    }

    /// Sources and headers are compilable; they make a directory a module.
    pub fn is_compilable(&self) -> bool {
        !matches!(self, FileRole::Other)
    }
}

/// Extension table used to classify files.
///
/// Extensions are stored lowercased without the leading dot and matched
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct FileClassifier {
    sources: Vec<String>,
    headers: Vec<String>,
}

impl Default for FileClassifier {
    fn default() -> Self {
        FileClassifier {
            sources: SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            headers: HEADER_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FileClassifier {
    /// Create a classifier with the conventional extension table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add extra source extensions (e.g. `cu`, `ixx`).
    pub fn with_source_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            if !ext.is_empty() && !self.sources.contains(&ext) {
                self.sources.push(ext);
            }
        }
        self
    }

    /// Add extra header extensions (e.g. `inl`, `tpp`).
    pub fn with_header_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            if !ext.is_empty() && !self.headers.contains(&ext) {
                self.headers.push(ext);
            }
        }
        self
    }

    /// Classify a path by its extension.
    pub fn classify(&self, path: &Path) -> FileRole {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return FileRole::Other;
        };
        let ext = ext.to_ascii_lowercase();

        if self.sources.contains(&ext) {
            let language = if ext == "c" { Language::C } else { Language::Cxx };
            FileRole::Source(language)
        } else if self.headers.contains(&ext) {
            FileRole::Header
        } else {
            FileRole::Other
        }
    }
}

/// Classify a path with the conventional extension table.
pub fn classify(path: &Path) -> FileRole {
    FileClassifier::default().classify(path)
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
