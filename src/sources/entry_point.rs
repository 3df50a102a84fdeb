//! Program entry point detection.
//!
//! Detection is a textual heuristic, not a compiler-grade check: an entry
//! point produced by a macro (`IMPLEMENT_APP(...)`, test framework mains)
//! is not seen, and a `main` inside `#if 0` is. Callers that know better
//! can plug in their own [`EntryPointDetector`].

use std::sync::LazyLock;

use regex::Regex;

/// Decides whether a source file's text defines a program entry point.
pub trait EntryPointDetector {
    fn has_entry_point(&self, text: &str) -> bool;
}

impl<F> EntryPointDetector for F
where
    F: Fn(&str) -> bool,
{
    fn has_entry_point(&self, text: &str) -> bool {
        self(text)
    }
}

static MAIN_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:int|auto)\s+(?:w?main|_tmain)\s*\(").expect("entry point pattern is valid")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").expect("comment pattern is valid"));

/// Looks for a `main` signature (`int main(`, `int wmain(`, `auto main(`)
/// outside line and block comments. The return type and the name may sit
/// on separate lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainFunctionDetector;

impl EntryPointDetector for MainFunctionDetector {
    fn has_entry_point(&self, text: &str) -> bool {
        let code = COMMENT.replace_all(text, " ");
        MAIN_SIGNATURE.is_match(&code)
    }
}
