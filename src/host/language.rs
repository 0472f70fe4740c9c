//! Guest Language Mapping
//!
//! Maps module file extensions to the guest language that evaluates them.
//! Language identity is always an explicit value handed down from the host
//! adapter; nothing in this crate infers it from runtime state.

use std::fmt;

/// A guest language the execution host can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    Python,
    Ruby,
    Wasm,
}

impl Language {
    /// Map a file extension (without the dot) to a guest language.
    /// Returns None for unrecognized extensions; callers that require a
    /// language treat that as a hard failure.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "js" | "mjs" | "ts" | "mts" => Some(Self::JavaScript),
            "py" => Some(Self::Python),
            "rb" => Some(Self::Ruby),
            "wasm" => Some(Self::Wasm),
            _ => None,
        }
    }

    /// Detect the language from a path or URI by its final extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let name = path.rsplit('/').next()?;
        let (stem, extension) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Self::from_extension(extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JavaScript => "js",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Wasm => "wasm",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
