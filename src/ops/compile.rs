//! The full build pipeline.
//!
//! Steps run strictly in order and the first failure ends the run:
//!
//! 1. wipe the build root
//! 2. install vcpkg packages
//! 3. configure and build the native sources
//! 4. generate SWIG bindings
//! 5. publish the managed solution
//! 6. install the native build into the package
//! 7. install the managed build into the package
//!
//! The elapsed time is reported whether the run succeeds or not.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::builder::{
    BindingGenerator, BuildTarget, CMake, CompilerKind, DotNet, DriverError, DriverResult,
    ManagedBuild, NativeBuild, PackageManager, Swig, Toolbox, Vcpkg,
};
use crate::core::{Architecture, BuildConfig, Host, Layout, Platform, Triplet};
use crate::util::config::Config;
use crate::util::fs::recreate_dir;
use crate::util::shell::{format_duration, Shell, Status};

/// One stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CleanBuildRoot,
    BuildPackages,
    CompileNative,
    GenerateBindings,
    CompileManaged,
    InstallNative,
    InstallManaged,
}

impl Step {
    /// Every step, in execution order.
    pub const ALL: [Step; 7] = [
        Step::CleanBuildRoot,
        Step::BuildPackages,
        Step::CompileNative,
        Step::GenerateBindings,
        Step::CompileManaged,
        Step::InstallNative,
        Step::InstallManaged,
    ];

    /// The external tool the step drives.
    pub fn tool(&self) -> &'static str {
        match self {
            Step::CleanBuildRoot => "fs",
            Step::BuildPackages => "vcpkg",
            Step::CompileNative | Step::InstallNative => "cmake",
            Step::GenerateBindings => "swig",
            Step::CompileManaged | Step::InstallManaged => "dotnet",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Step::CleanBuildRoot => "clean build directory",
            Step::BuildPackages => "build vcpkg packages",
            Step::CompileNative => "compile native components",
            Step::GenerateBindings => "generate bindings",
            Step::CompileManaged => "compile managed components",
            Step::InstallNative => "install native components",
            Step::InstallManaged => "install managed components",
        }
    }

    fn status(&self) -> Status {
        match self {
            Step::CleanBuildRoot => Status::Cleaning,
            Step::BuildPackages | Step::InstallNative | Step::InstallManaged => Status::Installing,
            Step::CompileNative => Status::Compiling,
            Step::GenerateBindings => Status::Generating,
            Step::CompileManaged => Status::Publishing,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The step that stopped the pipeline, and why.
#[derive(Debug, Error)]
#[error("failed to {step} ({})", .step.tool())]
pub struct StepFailure {
    pub step: Step,
    #[source]
    pub source: DriverError,
}

/// What to build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub config: BuildConfig,
    pub compiler: CompilerKind,
    /// Target platform, `None` for the host's
    pub platform: Option<Platform>,
    /// Target architecture, `None` for the host's
    pub arch: Option<Architecture>,
    /// Assume vcpkg packages are already installed
    pub skip_packages: bool,
}

impl BuildOptions {
    pub fn target(&self) -> BuildTarget {
        BuildTarget::new(self.config)
            .with_platform(self.platform)
            .with_arch(self.arch)
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Wall-clock time of the whole run
    pub elapsed: Duration,
    /// Steps that finished, in order
    pub completed: Vec<Step>,
    pub failure: Option<StepFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// The drivers a pipeline runs.
pub struct Drivers {
    pub packages: Box<dyn PackageManager>,
    pub native: Box<dyn NativeBuild>,
    pub bindings: Box<dyn BindingGenerator>,
    pub managed: Box<dyn ManagedBuild>,
}

impl Drivers {
    /// The real toolchain drivers for a project.
    pub fn system(toolbox: &Toolbox, layout: &Layout, config: &Config) -> Self {
        let cmake = CMake::new(toolbox.clone(), &layout.native_src)
            .generator(config.generator())
            .compilers(config.compiler_pair());

        Drivers {
            packages: Box::new(Vcpkg::new(toolbox.clone(), &layout.native_src)),
            native: Box::new(cmake),
            bindings: Box::new(Swig::new(
                toolbox.clone(),
                &layout.bindings_src,
                &layout.native_src,
            )),
            managed: Box::new(DotNet::new(
                toolbox.clone(),
                &layout.managed_src,
                &layout.managed_staging,
            )),
        }
    }
}

/// Runs every build step for one project.
pub struct Pipeline {
    layout: Layout,
    host: Host,
    shell: Arc<Shell>,
    drivers: Drivers,
}

impl Pipeline {
    pub fn new(layout: Layout, host: Host, shell: Arc<Shell>, drivers: Drivers) -> Self {
        Pipeline {
            layout,
            host,
            shell,
            drivers,
        }
    }

    /// Run the pipeline. Failures are reported in the returned report,
    /// never as an `Err`.
    pub fn run(&self, opts: &BuildOptions) -> BuildReport {
        let start = Instant::now();
        let mut report = BuildReport::default();

        let result = self.run_steps(opts, &mut report);
        report.elapsed = start.elapsed();

        match result {
            Ok(()) => {
                self.shell.status(
                    Status::Finished,
                    format!(
                        "{} into {} in {}",
                        opts.config,
                        self.layout.package_dir.display(),
                        format_duration(report.elapsed)
                    ),
                );
            }
            Err(failure) => {
                tracing::debug!("{} failed: {:?}", failure.step.tool(), failure.source);
                self.shell.error(format!("{}: {}", failure, failure.source));
                self.shell.note(format!(
                    "build failed after {}",
                    format_duration(report.elapsed)
                ));
                report.failure = Some(failure);
            }
        }

        report
    }

    fn run_steps(
        &self,
        opts: &BuildOptions,
        report: &mut BuildReport,
    ) -> Result<(), StepFailure> {
        let layout = &self.layout;
        let target = opts.target();
        let resolved = target.resolve(self.host);
        let drivers = &self.drivers;

        if resolved == self.host {
            tracing::info!("Building for host {}", self.host);
        } else {
            tracing::info!("Building for {} on {}", resolved, self.host);
        }

        self.step(report, Step::CleanBuildRoot, || {
            recreate_dir(&layout.build_dir)?;
            Ok(())
        })?;

        if opts.skip_packages {
            self.shell.status(Status::Skipped, Step::BuildPackages);
        } else {
            self.step(report, Step::BuildPackages, || {
                let triplet = self.package_triplet(resolved)?;
                drivers.packages.build_packages(triplet)
            })?;
        }

        self.step(report, Step::CompileNative, || {
            drivers.native.clean(&layout.native_out)?;
            drivers
                .native
                .compile(&layout.native_out, &target, opts.compiler)
        })?;

        let generated = self.step(report, Step::GenerateBindings, || {
            drivers.bindings.generate(&layout.bindings_out)
        })?;
        tracing::debug!("{} binding interface(s) generated", generated);

        self.step(report, Step::CompileManaged, || {
            drivers.managed.clean(&layout.managed_out)?;
            drivers.managed.compile(&layout.managed_out, &target)
        })?;

        self.step(report, Step::InstallNative, || {
            drivers
                .native
                .install(&layout.native_out, &layout.package_dir)
        })?;

        self.step(report, Step::InstallManaged, || {
            drivers
                .managed
                .install(&layout.managed_out, &layout.package_dir)
        })?;

        Ok(())
    }

    /// `None` installs for the host triplet.
    fn package_triplet(&self, target: Host) -> DriverResult<Option<Triplet>> {
        if target == self.host {
            return Ok(None);
        }
        Triplet::for_host(target)
            .map(Some)
            .ok_or(DriverError::UnsupportedTarget {
                platform: target.platform,
                arch: target.arch,
            })
    }

    fn step<T>(
        &self,
        report: &mut BuildReport,
        step: Step,
        f: impl FnOnce() -> DriverResult<T>,
    ) -> Result<T, StepFailure> {
        let span = self.shell.span(step.status(), step);

        match f() {
            Ok(value) => {
                let elapsed = span.finish_with_message(step);
                tracing::debug!("{} took {:?}", step.tool(), elapsed);
                report.completed.push(step);
                Ok(value)
            }
            Err(source) => Err(StepFailure { step, source }),
        }
    }
}

/// Build the project at `layout` with the real toolchain.
pub fn compile(
    layout: &Layout,
    config: &Config,
    toolbox: &Toolbox,
    opts: &BuildOptions,
) -> BuildReport {
    let drivers = Drivers::system(toolbox, layout, config);
    let pipeline = Pipeline::new(
        layout.clone(),
        toolbox.host,
        Arc::clone(&toolbox.shell),
        drivers,
    );
    pipeline.run(opts)
}
