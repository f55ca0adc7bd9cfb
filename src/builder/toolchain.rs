//! C/C++ compiler discovery.
//!
//! A compiler family names a (C compiler, C++ compiler) executable pair.
//! Both halves must be found for the pair to be usable.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::platform::{ParseValueError, Platform};
use crate::util::process::ToolLookup;

/// Compiler family requested for the native build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerKind {
    #[default]
    #[serde(alias = "gnu")]
    Gcc,
    #[serde(alias = "llvm")]
    Clang,
    #[serde(alias = "cl")]
    Msvc,
    /// First family found on this host
    Any,
}

impl CompilerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerKind::Gcc => "gcc",
            CompilerKind::Clang => "clang",
            CompilerKind::Msvc => "msvc",
            CompilerKind::Any => "any",
        }
    }

    /// Executable names for a concrete family. `None` for `Any`.
    pub fn executables(&self) -> Option<(&'static str, &'static str)> {
        match self {
            CompilerKind::Gcc => Some(("gcc", "g++")),
            CompilerKind::Clang => Some(("clang", "clang++")),
            CompilerKind::Msvc => Some(("cl", "cl")),
            CompilerKind::Any => None,
        }
    }

    /// Families tried, in order, for `kind` on a host platform.
    pub fn search_order(&self, host: Platform) -> Vec<CompilerKind> {
        match self {
            CompilerKind::Any if host == Platform::Windows => {
                vec![CompilerKind::Msvc, CompilerKind::Clang, CompilerKind::Gcc]
            }
            CompilerKind::Any => vec![CompilerKind::Clang, CompilerKind::Gcc],
            kind => vec![*kind],
        }
    }

    /// The executable pairs searched for, as `cc/cxx` joined by commas.
    pub fn candidates(&self, host: Platform) -> String {
        self.search_order(host)
            .iter()
            .filter_map(CompilerKind::executables)
            .map(|(cc, cxx)| format!("{}/{}", cc, cxx))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompilerKind {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcc" | "gnu" => Ok(CompilerKind::Gcc),
            "clang" | "llvm" => Ok(CompilerKind::Clang),
            "msvc" | "cl" => Ok(CompilerKind::Msvc),
            "any" => Ok(CompilerKind::Any),
            _ => Err(ParseValueError::new("compiler", s, "gcc, clang, msvc, any")),
        }
    }
}

/// Resolved C and C++ compiler executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerPair {
    pub cc: PathBuf,
    pub cxx: PathBuf,
}

impl CompilerPair {
    pub fn new(cc: impl Into<PathBuf>, cxx: impl Into<PathBuf>) -> Self {
        CompilerPair {
            cc: cc.into(),
            cxx: cxx.into(),
        }
    }

    pub fn cc(&self) -> &Path {
        &self.cc
    }

    pub fn cxx(&self) -> &Path {
        &self.cxx
    }
}

/// Find the compiler pair for `kind`, or `None` if either half is missing.
pub fn find_compiler_pair(
    tools: &dyn ToolLookup,
    kind: CompilerKind,
    host: Platform,
) -> Option<CompilerPair> {
    for family in kind.search_order(host) {
        let Some((cc_name, cxx_name)) = family.executables() else {
            continue;
        };

        match (tools.find(cc_name), tools.find(cxx_name)) {
            (Some(cc), Some(cxx)) => {
                tracing::debug!(
                    "Using {} compilers: {} / {}",
                    family,
                    cc.display(),
                    cxx.display()
                );
                return Some(CompilerPair::new(cc, cxx));
            }
            (cc, cxx) => {
                tracing::debug!(
                    "{} incomplete (cc: {}, cxx: {})",
                    family,
                    cc.is_some(),
                    cxx.is_some()
                );
            }
        }
    }

    None
}
