//! Languages and language standards.
//!
//! The scanner tags every source file with a [`Language`] so the root
//! document can declare only the languages the project actually uses.
//! Standards are read from configuration and rendered into the root
//! `CMakeLists.txt`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source language of a compilable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C, from `.c` sources
    C,
    /// C++, from every other source extension
    #[serde(alias = "cpp", alias = "c++")]
    Cxx,
}

impl Language {
    /// Language name as CMake spells it in `project(... LANGUAGES ...)`.
    pub fn cmake_name(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cxx => "CXX",
        }
    }
}

/// C++ standard version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CppStandard {
    #[serde(rename = "11", alias = "c++11", alias = "cpp11")]
    Cpp11,
    #[serde(rename = "14", alias = "c++14", alias = "cpp14")]
    Cpp14,
    #[serde(rename = "17", alias = "c++17", alias = "cpp17")]
    Cpp17,
    #[serde(rename = "20", alias = "c++20", alias = "cpp20")]
    Cpp20,
    #[serde(rename = "23", alias = "c++23", alias = "cpp23")]
    Cpp23,
}

impl Default for CppStandard {
    fn default() -> Self {
        CppStandard::Cpp11
    }
}

impl CppStandard {
    /// Value for `CMAKE_CXX_STANDARD`.
    pub fn cmake_value(&self) -> &'static str {
        match self {
            CppStandard::Cpp11 => "11",
            CppStandard::Cpp14 => "14",
            CppStandard::Cpp17 => "17",
            CppStandard::Cpp20 => "20",
            CppStandard::Cpp23 => "23",
        }
    }
}

impl std::str::FromStr for CppStandard {
    type Err = StandardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "11" | "c++11" | "cpp11" => Ok(CppStandard::Cpp11),
            "14" | "c++14" | "cpp14" => Ok(CppStandard::Cpp14),
            "17" | "c++17" | "cpp17" => Ok(CppStandard::Cpp17),
            "20" | "c++20" | "cpp20" => Ok(CppStandard::Cpp20),
            "23" | "c++23" | "cpp23" => Ok(CppStandard::Cpp23),
            _ => Err(StandardParseError {
                language: "C++",
                value: s.to_string(),
                valid: "11, 14, 17, 20, 23",
            }),
        }
    }
}

impl std::fmt::Display for CppStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C++{}", self.cmake_value())
    }
}

/// C standard version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CStandard {
    /// C89 (also known as C90)
    #[serde(rename = "89", alias = "c89", alias = "90", alias = "c90")]
    C89,
    #[serde(rename = "99", alias = "c99")]
    C99,
    #[serde(rename = "11", alias = "c11")]
    C11,
    /// C17 (also known as C18)
    #[serde(rename = "17", alias = "c17", alias = "18", alias = "c18")]
    C17,
    #[serde(rename = "23", alias = "c23")]
    C23,
}

impl CStandard {
    /// Value for `CMAKE_C_STANDARD`. CMake spells C89 as `90`.
    pub fn cmake_value(&self) -> &'static str {
        match self {
            CStandard::C89 => "90",
            CStandard::C99 => "99",
            CStandard::C11 => "11",
            CStandard::C17 => "17",
            CStandard::C23 => "23",
        }
    }
}

impl std::str::FromStr for CStandard {
    type Err = StandardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "89" | "c89" | "90" | "c90" => Ok(CStandard::C89),
            "99" | "c99" => Ok(CStandard::C99),
            "11" | "c11" => Ok(CStandard::C11),
            "17" | "c17" | "18" | "c18" => Ok(CStandard::C17),
            "23" | "c23" => Ok(CStandard::C23),
            _ => Err(StandardParseError {
                language: "C",
                value: s.to_string(),
                valid: "89, 99, 11, 17, 23",
            }),
        }
    }
}

impl std::fmt::Display for CStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let year = match self {
            CStandard::C89 => "89",
            other => other.cmake_value(),
        };
        write!(f, "C{}", year)
    }
}

/// Error returned when parsing an invalid language standard.
#[derive(Debug, Clone, Error)]
#[error("invalid {language} standard '{value}', valid values: {valid}")]
pub struct StandardParseError {
    pub language: &'static str,
    pub value: String,
    pub valid: &'static str,
}
