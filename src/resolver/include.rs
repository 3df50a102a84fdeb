//! Include directive parser.
//!
//! A single pass over the text, one line at a time. Conditional
//! compilation is not evaluated, so an include inside `#if 0` is still
//! reported. Block comments are not tracked either: a directive inside a
//! `/* ... */` spanning several lines is reported as if it were live.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static INCLUDE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*#\s*include\s*(?:"([^"]+)"|<([^>]+)>)"#)
        .expect("include pattern is valid")
});

/// One `#include` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeEdge {
    /// Including file, relative to the project root
    pub from: PathBuf,
    /// Text between the quotes or angle brackets
    pub token: String,
    /// `true` for `"quoted"`, `false` for `<angled>` includes
    pub is_local: bool,
    /// 1-based line number of the directive
    pub line: usize,
}

/// Extract every include directive from `text`.
///
/// `from` is recorded on each edge as-is.
pub fn parse_includes(from: &Path, text: &str) -> Vec<IncludeEdge> {
    let mut edges = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim_start().starts_with("//") {
            continue;
        }

        let Some(caps) = INCLUDE_DIRECTIVE.captures(line) else {
            continue;
        };

        let (token, is_local) = match (caps.get(1), caps.get(2)) {
            (Some(quoted), _) => (quoted.as_str(), true),
            (None, Some(angled)) => (angled.as_str(), false),
            (None, None) => continue,
        };

        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        edges.push(IncludeEdge {
            from: from.to_path_buf(),
            token: token.to_string(),
            is_local,
            line: idx + 1,
        });
    }

    edges
}
