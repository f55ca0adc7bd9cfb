//! Shared driver context: process runner, tool lookup, host and job count.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::builder::errors::{DriverError, DriverResult};
use crate::core::Host;
use crate::util::process::{
    PathLookup, ProcessBuilder, ProcessOutput, ProcessRunner, SystemRunner, ToolLookup,
};
use crate::util::shell::{ColorChoice, Shell, Verbosity};

/// Everything a driver needs to reach the outside world.
#[derive(Clone)]
pub struct Toolbox {
    /// Runs external tools
    pub runner: Arc<dyn ProcessRunner>,

    /// Finds external tools
    pub tools: Arc<dyn ToolLookup>,

    /// The machine running the build
    pub host: Host,

    /// Worker count handed to tools that accept one
    pub jobs: usize,

    /// User-facing output
    pub shell: Arc<Shell>,
}

impl fmt::Debug for Toolbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolbox")
            .field("host", &self.host)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}

impl Toolbox {
    /// A toolbox for the real system.
    pub fn system(tools: PathLookup, shell: Arc<Shell>) -> Self {
        Toolbox {
            runner: Arc::new(SystemRunner),
            tools: Arc::new(tools),
            host: Host::current(),
            jobs: default_jobs(),
            shell,
        }
    }

    /// A toolbox with explicit collaborators.
    pub fn new(runner: Arc<dyn ProcessRunner>, tools: Arc<dyn ToolLookup>, host: Host) -> Self {
        Toolbox {
            runner,
            tools,
            host,
            jobs: default_jobs(),
            shell: Arc::new(Shell::new(Verbosity::Quiet, ColorChoice::Never)),
        }
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_shell(mut self, shell: Arc<Shell>) -> Self {
        self.shell = shell;
        self
    }

    /// Locate `tool` or fail with [`DriverError::ToolMissing`].
    pub fn require(&self, tool: &str) -> DriverResult<PathBuf> {
        self.tools
            .find(tool)
            .ok_or_else(|| DriverError::tool_missing(tool))
    }

    /// Run `cmd` and require a zero exit status.
    pub fn run_checked(&self, tool: &str, cmd: &ProcessBuilder) -> DriverResult<ProcessOutput> {
        let output = self.runner.run(cmd)?;
        if !output.success() {
            return Err(DriverError::tool_failed(tool, cmd, &output));
        }
        Ok(output)
    }
}

/// One less than the number of logical cores, at least 1.
pub fn default_jobs() -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or_else(|_| {
            tracing::debug!("Unable to query cpu cores, defaulting to 1");
            1
        });
    cores.saturating_sub(1).max(1)
}
