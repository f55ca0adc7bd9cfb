//! Driver error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::builder::toolchain::CompilerKind;
use crate::core::{Architecture, Platform};
use crate::util::process::{ProcessBuilder, ProcessOutput};

/// Why a driver operation failed.
#[derive(Debug, Error)]
pub enum DriverError {
    /// A required executable is not installed or not on `PATH`.
    #[error("`{tool}` not found; install it or add it to PATH")]
    ToolMissing { tool: String },

    /// A tool ran and exited non-zero.
    #[error("`{command}` failed with exit code {}\n{stderr}", display_code(.code))]
    ToolFailed {
        tool: String,
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// No C/C++ compiler pair of the requested family is installed.
    #[error("no {kind} C/C++ compiler pair found; looked for {searched}")]
    CompilerMissing { kind: CompilerKind, searched: String },

    /// An expected input could not be found.
    #[error("no {what} found in {}", .path.display())]
    Discovery { what: String, path: PathBuf },

    /// The publish output to install from does not exist.
    #[error("build output not found: {}", .path.display())]
    MissingStaging { path: PathBuf },

    /// Output directory is empty after an apparently successful build.
    #[error("build output is empty: {}", .path.display())]
    EmptyOutput { path: PathBuf },

    /// The package directory does not have the expected layout.
    #[error("install destination is missing: {}", .path.display())]
    MissingDestination { path: PathBuf },

    /// No toolchain naming exists for this pair.
    #[error("unsupported target {platform}-{arch}")]
    UnsupportedTarget {
        platform: Platform,
        arch: Architecture,
    },

    /// Every binding interface failed to generate.
    #[error("binding generation failed for all {attempted} interface(s)")]
    NoBindings { attempted: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DriverError {
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        DriverError::ToolMissing { tool: tool.into() }
    }

    pub fn compiler_missing(kind: CompilerKind, host: Platform) -> Self {
        DriverError::CompilerMissing {
            kind,
            searched: kind.candidates(host),
        }
    }

    pub fn discovery(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        DriverError::Discovery {
            what: what.into(),
            path: path.into(),
        }
    }

    /// A non-zero exit from `cmd`.
    pub fn tool_failed(
        tool: impl Into<String>,
        cmd: &ProcessBuilder,
        output: &ProcessOutput,
    ) -> Self {
        DriverError::ToolFailed {
            tool: tool.into(),
            command: cmd.display_command(),
            code: output.code,
            stderr: output.stderr.trim_end().to_string(),
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
