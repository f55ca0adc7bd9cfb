//! .NET driver for the managed sources.
//!
//! `compile` publishes the solution into a staging directory beside the
//! managed sources. `install` moves staging into the managed output
//! directory and copies that into the package's `bin` folder.

use std::path::{Path, PathBuf};

use crate::builder::context::Toolbox;
use crate::builder::driver::{BuildTarget, ManagedBuild};
use crate::builder::errors::{DriverError, DriverResult};
use crate::core::triplet::runtime_identifier;
use crate::util::fs::{
    copy_entries, ensure_dir, is_dir_empty, move_entries, recreate_dir, remove_dir_all_if_exists,
};
use crate::util::process::ProcessBuilder;

/// Executable name.
pub const DOTNET: &str = "dotnet";

/// Drives `dotnet publish`.
#[derive(Debug, Clone)]
pub struct DotNet {
    toolbox: Toolbox,
    source_dir: PathBuf,
    staging_dir: PathBuf,
}

impl DotNet {
    /// `source_dir` holds the solution; publish output lands in
    /// `staging_dir` until installed.
    pub fn new(
        toolbox: Toolbox,
        source_dir: impl Into<PathBuf>,
        staging_dir: impl Into<PathBuf>,
    ) -> Self {
        DotNet {
            toolbox,
            source_dir: source_dir.into(),
            staging_dir: staging_dir.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.toolbox.tools.is_available(DOTNET)
    }

    /// The solution file directly inside the source directory.
    pub fn find_solution(&self) -> DriverResult<PathBuf> {
        let dir = glob::Pattern::escape(&self.source_dir.to_string_lossy());
        let pattern = Path::new(&dir).join("*.sln").to_string_lossy().into_owned();

        let mut found: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| anyhow::anyhow!("invalid solution pattern `{}`: {}", pattern, e))?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        found.sort();

        let mut solutions = found.into_iter();
        let Some(first) = solutions.next() else {
            return Err(DriverError::discovery("solution file (*.sln)", &self.source_dir));
        };
        let rest: Vec<_> = solutions.collect();
        if !rest.is_empty() {
            tracing::warn!(
                "Found {} solution files, using {}",
                rest.len() + 1,
                first.display()
            );
        }

        Ok(first)
    }

    /// The publish command for `solution`.
    pub fn publish_command(
        &self,
        dotnet: &Path,
        solution: &Path,
        target: &BuildTarget,
    ) -> ProcessBuilder {
        let resolved = target.resolve(self.toolbox.host);
        let rid = runtime_identifier(resolved.platform, resolved.arch);

        ProcessBuilder::new(dotnet)
            .arg("publish")
            .arg(solution)
            .arg("-c")
            .arg(target.config.as_str())
            .arg("-o")
            .arg(&self.staging_dir)
            .args(["--self-contained", "false"])
            .arg("-r")
            .arg(rid)
            .arg(format!("-maxcpucount:{}", self.toolbox.jobs))
            .args(["--verbosity", "minimal"])
    }
}

impl ManagedBuild for DotNet {
    fn clean(&self, out_dir: &Path) -> DriverResult<()> {
        if out_dir.exists() {
            tracing::debug!("Removing managed output {}", out_dir.display());
        }
        remove_dir_all_if_exists(out_dir)?;
        Ok(())
    }

    fn compile(&self, out_dir: &Path, target: &BuildTarget) -> DriverResult<()> {
        let dotnet = self.toolbox.require(DOTNET)?;

        remove_dir_all_if_exists(&self.staging_dir)?;
        recreate_dir(out_dir)?;

        let solution = self.find_solution()?;
        tracing::info!(
            "Publishing {} with {} cpu cores",
            solution.display(),
            self.toolbox.jobs
        );

        let cmd = self.publish_command(&dotnet, &solution, target);
        self.toolbox.run_checked(DOTNET, &cmd)?;

        tracing::info!("Published to {}", self.staging_dir.display());
        Ok(())
    }

    fn install(&self, out_dir: &Path, to_dir: &Path) -> DriverResult<()> {
        if !self.staging_dir.is_dir() {
            return Err(DriverError::MissingStaging {
                path: self.staging_dir.clone(),
            });
        }

        ensure_dir(out_dir)?;
        let moved = move_entries(&self.staging_dir, out_dir)?;
        remove_dir_all_if_exists(&self.staging_dir)?;
        tracing::debug!("Moved {} entries into {}", moved, out_dir.display());

        if is_dir_empty(out_dir)? {
            return Err(DriverError::EmptyOutput {
                path: out_dir.to_path_buf(),
            });
        }

        let bin_dir = to_dir.join("bin");
        if !bin_dir.is_dir() {
            return Err(DriverError::MissingDestination { path: bin_dir });
        }

        let copied = copy_entries(out_dir, &bin_dir)?;
        tracing::info!(
            "Installed {} managed entries {} -> {}",
            copied,
            out_dir.display(),
            bin_dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use super::*;
    use crate::core::{Architecture, BuildConfig, Host, Layout, Platform};
    use crate::test_support::{
        CommandExpectation, CommandPattern, FakeTools, MockProcessOutput, MockRunner,
        ProjectFixture,
    };

    fn driver(runner: &Arc<MockRunner>, tools: FakeTools, layout: &Layout) -> DotNet {
        let toolbox = Toolbox::new(
            runner.clone(),
            Arc::new(tools),
            Host::new(Platform::Linux, Architecture::X64),
        )
        .with_jobs(7);
        DotNet::new(toolbox, &layout.managed_src, &layout.managed_staging)
    }

    #[test]
    fn test_is_available() {
        let (_tmp, layout) = ProjectFixture::new().create();
        let runner = Arc::new(MockRunner::new());

        assert!(driver(&runner, FakeTools::new().with("dotnet"), &layout).is_available());
        assert!(!driver(&runner, FakeTools::new().with("swig"), &layout).is_available());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_publish_command_shape() {
        let (_tmp, layout) = ProjectFixture::new().create();
        let runner = Arc::new(MockRunner::succeeding());
        let dotnet = driver(&runner, FakeTools::new().with("dotnet"), &layout);

        dotnet
            .compile(&layout.managed_out, &BuildTarget::new(BuildConfig::Release))
            .unwrap();

        assert_eq!(
            runner.command_lines(),
            [format!(
                "/usr/bin/dotnet publish {} -c Release -o {} --self-contained false \
                 -r linux-x64 -maxcpucount:7 --verbosity minimal",
                layout.managed_src.join("Torsion.sln").display(),
                layout.managed_staging.display()
            )]
        );
        assert!(layout.managed_out.is_dir());
    }

    #[test]
    fn test_runtime_identifier_follows_target() {
        let (_tmp, layout) = ProjectFixture::new().create();
        let runner = Arc::new(MockRunner::succeeding());
        let dotnet = driver(&runner, FakeTools::new().with("dotnet"), &layout);

        let target = BuildTarget::new(BuildConfig::Debug)
            .with_platform(Some(Platform::Windows))
            .with_arch(Some(Architecture::Arm64));
        dotnet.compile(&layout.managed_out, &target).unwrap();

        assert!(runner.command_lines()[0].contains(" -r win-arm64 "));
    }

    #[test]
    fn test_first_solution_in_sorted_order() {
        let (_tmp, layout) = ProjectFixture::new()
            .with_solutions(&["Zeta.sln", "Alpha.sln"])
            .create();
        let runner = Arc::new(MockRunner::succeeding());
        let dotnet = driver(&runner, FakeTools::new().with("dotnet"), &layout);

        assert_eq!(
            dotnet.find_solution().unwrap(),
            layout.managed_src.join("Alpha.sln")
        );
    }

    #[test]
    fn test_missing_solution_is_discovery_failure() {
        let (_tmp, layout) = ProjectFixture::new().with_solutions(&[]).create();
        let runner = Arc::new(MockRunner::succeeding());
        let dotnet = driver(&runner, FakeTools::new().with("dotnet"), &layout);

        let err = dotnet
            .compile(&layout.managed_out, &BuildTarget::default())
            .unwrap_err();
        assert!(matches!(err, DriverError::Discovery { .. }));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_compile_clears_leftover_staging() {
        let (_tmp, layout) = ProjectFixture::new().create();
        fs::create_dir_all(&layout.managed_staging).unwrap();
        fs::write(layout.managed_staging.join("old.dll"), "").unwrap();

        let runner = Arc::new(MockRunner::new());
        runner.set_default(MockProcessOutput::failure(1, "error MSB1009"));
        let dotnet = driver(&runner, FakeTools::new().with("dotnet"), &layout);

        let err = dotnet
            .compile(&layout.managed_out, &BuildTarget::default())
            .unwrap_err();
        assert!(matches!(err, DriverError::ToolFailed { .. }));
        assert!(!layout.managed_staging.exists());
    }

    #[test]
    fn test_compile_then_install() {
        let (_tmp, layout) = ProjectFixture::new().create();
        let runner = Arc::new(MockRunner::new());
        runner.expect_pattern(
            CommandExpectation::new(
                CommandPattern::StartsWith("/usr/bin/dotnet publish".to_string()),
                MockProcessOutput::success(""),
            )
            .creates(layout.managed_staging.join("Torsion.dll"), "dll")
            .creates(layout.managed_staging.join("runtimes/linux-x64/native.so"), "so"),
        );
        let dotnet = driver(&runner, FakeTools::new().with("dotnet"), &layout);
        fs::create_dir_all(layout.package_bin()).unwrap();

        dotnet.compile(&layout.managed_out, &BuildTarget::default()).unwrap();
        dotnet.install(&layout.managed_out, &layout.package_dir).unwrap();

        assert!(!layout.managed_staging.exists());
        assert!(layout.managed_out.join("Torsion.dll").is_file());
        assert!(layout.package_bin().join("Torsion.dll").is_file());
        assert!(layout
            .package_bin()
            .join("runtimes/linux-x64/native.so")
            .is_file());
    }

    #[test]
    fn test_install_without_staging() {
        let (_tmp, layout) = ProjectFixture::new().create();
        let runner = Arc::new(MockRunner::new());
        let dotnet = driver(&runner, FakeTools::new(), &layout);

        let err = dotnet
            .install(&layout.managed_out, &layout.package_dir)
            .unwrap_err();
        assert!(matches!(err, DriverError::MissingStaging { .. }));
    }

    #[test]
    fn test_install_with_empty_output() {
        let (_tmp, layout) = ProjectFixture::new().create();
        fs::create_dir_all(&layout.managed_staging).unwrap();
        fs::create_dir_all(layout.package_bin()).unwrap();

        let runner = Arc::new(MockRunner::new());
        let dotnet = driver(&runner, FakeTools::new(), &layout);

        let err = dotnet
            .install(&layout.managed_out, &layout.package_dir)
            .unwrap_err();
        assert!(matches!(err, DriverError::EmptyOutput { .. }));
    }

    #[test]
    fn test_install_without_package_bin() {
        let (_tmp, layout) = ProjectFixture::new().create();
        fs::create_dir_all(&layout.managed_staging).unwrap();
        fs::write(layout.managed_staging.join("Torsion.dll"), "dll").unwrap();

        let runner = Arc::new(MockRunner::new());
        let dotnet = driver(&runner, FakeTools::new(), &layout);

        match dotnet
            .install(&layout.managed_out, &layout.package_dir)
            .unwrap_err()
        {
            DriverError::MissingDestination { path } => assert_eq!(path, layout.package_bin()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
