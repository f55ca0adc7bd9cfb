//! Subprocess execution utilities.
//!
//! Drivers never spawn processes or search `PATH` directly. They build a
//! [`ProcessBuilder`] and hand it to a [`ProcessRunner`], and they find
//! executables through a [`ToolLookup`].

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable for the child only.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the child's working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get a child environment variable.
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a process to completion.
pub trait ProcessRunner {
    /// Spawn the process and wait for it. An `Err` means the process could
    /// not be started at all; a non-zero exit is reported in the output.
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput>;
}

/// Runs processes on the real system with stdout and stderr captured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, pb: &ProcessBuilder) -> Result<ProcessOutput> {
        tracing::debug!("Running `{}`", pb.display_command());

        let mut cmd = pb.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd
            .output()
            .with_context(|| format!("failed to spawn `{}`", pb.program.display()))?;

        let output = ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        for line in output.stdout.lines() {
            tracing::debug!("{}", line);
        }

        Ok(output)
    }
}

/// Locates executables.
pub trait ToolLookup {
    fn find(&self, name: &str) -> Option<PathBuf>;

    fn is_available(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}

/// Looks tools up on `PATH`, with optional explicit paths taking precedence.
#[derive(Debug, Clone, Default)]
pub struct PathLookup {
    overrides: HashMap<String, PathBuf>,
}

impl PathLookup {
    pub fn new() -> Self {
        PathLookup::default()
    }

    /// Use `path` for `name` instead of searching.
    pub fn with_override(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(name.into(), path.into());
        self
    }
}

impl ToolLookup for PathLookup {
    fn find(&self, name: &str) -> Option<PathBuf> {
        if let Some(path) = self.overrides.get(name) {
            if path.exists() {
                return Some(path.clone());
            }
            // A bare name such as `clang-18` is searched like any other tool
            if let Ok(found) = which::which(path) {
                return Some(found);
            }
            tracing::warn!("Configured {} not found: {}", name, path.display());
            return None;
        }
        find_executable(name)
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
