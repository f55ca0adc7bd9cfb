//! Test utilities and mocks for unit tests.
//!
//! Provides a recording process runner and an in-memory tool lookup so
//! driver command lines can be asserted without the real tools installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use torsion_build::test_support::{FakeTools, MockProcessOutput, MockRunner};
//!
//! let runner = Arc::new(MockRunner::new());
//! runner.expect_prefix("/usr/bin/cmake --build", MockProcessOutput::success(""));
//! let tools = FakeTools::new().with("cmake");
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use tracing_subscriber::fmt::MakeWriter;

use crate::util::process::{ProcessBuilder, ProcessOutput, ProcessRunner, ToolLookup};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn to_output(&self) -> ProcessOutput {
        ProcessOutput {
            code: Some(self.status),
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

/// Pattern for matching commands in MockRunner.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// What a matched command does.
#[derive(Debug, Clone)]
enum Reply {
    Output(MockProcessOutput),
    SpawnError,
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    /// Pattern to match against commands.
    pub pattern: CommandPattern,
    reply: Reply,
    /// Files written when the command matches, as a real tool would.
    creates: Vec<(PathBuf, String)>,
}

impl CommandExpectation {
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation {
            pattern,
            reply: Reply::Output(output),
            creates: Vec::new(),
        }
    }

    /// The command cannot be started at all.
    pub fn spawn_error(pattern: CommandPattern) -> Self {
        CommandExpectation {
            pattern,
            reply: Reply::SpawnError,
            creates: Vec::new(),
        }
    }

    /// Write `content` to `path` (creating parents) when matched.
    pub fn creates(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.creates.push((path.into(), content.into()));
        self
    }
}

/// Recording process runner.
///
/// Expectations are checked in insertion order; the first match wins.
/// Unmatched commands fail unless a default output is set.
#[derive(Debug, Default)]
pub struct MockRunner {
    expectations: Mutex<Vec<CommandExpectation>>,
    calls: Mutex<Vec<ProcessBuilder>>,
    default_output: Mutex<Option<MockProcessOutput>>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// A runner where every command succeeds.
    pub fn succeeding() -> Self {
        let runner = MockRunner::new();
        runner.set_default(MockProcessOutput::success(""));
        runner
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ))
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&self, expectation: CommandExpectation) -> &Self {
        self.expectations
            .lock()
            .expect("mock runner poisoned")
            .push(expectation);
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        *self.default_output.lock().expect("mock runner poisoned") = Some(output);
        self
    }

    /// All commands run so far.
    pub fn calls(&self) -> Vec<ProcessBuilder> {
        self.calls.lock().expect("mock runner poisoned").clone()
    }

    /// All commands run so far, as display strings.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(ProcessBuilder::display_command)
            .collect()
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let line = cmd.display_command();
        self.calls
            .lock()
            .expect("mock runner poisoned")
            .push(cmd.clone());

        let matched = self
            .expectations
            .lock()
            .expect("mock runner poisoned")
            .iter()
            .find(|exp| exp.pattern.matches(&line))
            .cloned();

        let Some(exp) = matched else {
            let default = self.default_output.lock().expect("mock runner poisoned").clone();
            if let Some(default) = default {
                return Ok(default.to_output());
            }
            bail!("unexpected command: {}", line);
        };

        match exp.reply {
            Reply::SpawnError => bail!("failed to spawn `{}`", cmd.get_program().display()),
            Reply::Output(output) => {
                if output.status == 0 {
                    for (path, content) in &exp.creates {
                        if let Some(parent) = path.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(path, content)?;
                    }
                }
                Ok(output.to_output())
            }
        }
    }
}

/// In-memory tool lookup.
#[derive(Debug, Clone, Default)]
pub struct FakeTools {
    tools: HashMap<String, PathBuf>,
}

impl FakeTools {
    pub fn new() -> Self {
        FakeTools::default()
    }

    /// Register `name` at `/usr/bin/<name>`.
    pub fn with(self, name: &str) -> Self {
        let path = Path::new("/usr/bin").join(name);
        self.with_path(name, path)
    }

    /// Register `name` at an explicit path.
    pub fn with_path(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.tools.insert(name.to_string(), path.into());
        self
    }
}

impl ToolLookup for FakeTools {
    fn find(&self, name: &str) -> Option<PathBuf> {
        self.tools.get(name).cloned()
    }
}

/// In-memory sink for `tracing` output.
#[derive(Debug, Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` and return what it logged at `info` and above, without colour.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .finish();

    let value = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (value, logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_records_and_matches() {
        let runner = MockRunner::new();
        runner.expect("cmake --version", MockProcessOutput::success("cmake version 3.29"));

        let out = runner.run(&ProcessBuilder::new("cmake").arg("--version")).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "cmake version 3.29");
        assert_eq!(runner.command_lines(), ["cmake --version"]);

        assert!(runner.run(&ProcessBuilder::new("swig")).is_err());
    }

    #[test]
    fn test_mock_runner_creates_files_on_success() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("staging/Engine.dll");

        let runner = MockRunner::new();
        runner.expect_pattern(
            CommandExpectation::new(CommandPattern::Any, MockProcessOutput::success(""))
                .creates(&file, "dll"),
        );
        runner.run(&ProcessBuilder::new("dotnet")).unwrap();
        assert!(file.is_file());
    }

    #[test]
    fn test_fake_tools() {
        let tools = FakeTools::new().with("swig");
        assert_eq!(tools.find("swig"), Some(PathBuf::from("/usr/bin/swig")));
        assert!(!tools.is_available("dotnet"));
    }
}
