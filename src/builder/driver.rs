//! Driver traits.
//!
//! Each build stage is reached through one of these traits so the
//! pipeline can run against the real tools or against stand-ins.

use std::path::Path;

use crate::builder::errors::DriverResult;
use crate::builder::toolchain::CompilerKind;
use crate::core::{Architecture, BuildConfig, Host, Platform, Triplet};

/// What to build for. `None` platform or arch means the host's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildTarget {
    pub config: BuildConfig,
    pub platform: Option<Platform>,
    pub arch: Option<Architecture>,
}

impl BuildTarget {
    pub fn new(config: BuildConfig) -> Self {
        BuildTarget {
            config,
            platform: None,
            arch: None,
        }
    }

    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_arch(mut self, arch: Option<Architecture>) -> Self {
        self.arch = arch;
        self
    }

    /// The concrete target on `host`.
    pub fn resolve(&self, host: Host) -> Host {
        host.target(self.platform, self.arch)
    }
}

/// Installs third-party native packages.
pub trait PackageManager {
    /// Install packages for `triplet`, or for the host when `None`.
    fn build_packages(&self, triplet: Option<Triplet>) -> DriverResult<()>;
}

/// Configures, builds and installs the native sources.
pub trait NativeBuild {
    /// Remove the native build tree.
    fn clean(&self, out_dir: &Path) -> DriverResult<()>;

    /// Configure and build into `out_dir`, which is recreated first.
    fn compile(
        &self,
        out_dir: &Path,
        target: &BuildTarget,
        compiler: CompilerKind,
    ) -> DriverResult<()>;

    /// Install the build in `out_dir` under the prefix `to_dir`.
    fn install(&self, out_dir: &Path, to_dir: &Path) -> DriverResult<()>;
}

/// Generates managed bindings for the native API.
pub trait BindingGenerator {
    /// Generate into `out_dir`, which is recreated first. Returns how many
    /// interfaces were generated.
    fn generate(&self, out_dir: &Path) -> DriverResult<usize>;
}

/// Publishes and installs the managed sources.
pub trait ManagedBuild {
    /// Remove the managed output tree.
    fn clean(&self, out_dir: &Path) -> DriverResult<()>;

    /// Publish the managed solution.
    fn compile(&self, out_dir: &Path, target: &BuildTarget) -> DriverResult<()>;

    /// Move published output into `out_dir` and copy it into `to_dir/bin`.
    fn install(&self, out_dir: &Path, to_dir: &Path) -> DriverResult<()>;
}
