//! CMake driver for the native sources.

use std::path::{Path, PathBuf};

use crate::builder::context::Toolbox;
use crate::builder::driver::{BuildTarget, NativeBuild};
use crate::builder::errors::{DriverError, DriverResult};
use crate::builder::toolchain::{find_compiler_pair, CompilerKind, CompilerPair};
use crate::builder::vcpkg;
use crate::core::triplet::{cmake_system_name, cmake_system_processor};
use crate::core::Host;
use crate::util::fs::{recreate_dir, remove_dir_all_if_exists};
use crate::util::process::ProcessBuilder;

/// Executable name.
pub const CMAKE: &str = "cmake";

/// Default generator.
pub const DEFAULT_GENERATOR: &str = "Ninja";

/// CMake build adapter.
#[derive(Debug, Clone)]
pub struct CMake {
    toolbox: Toolbox,
    source_dir: PathBuf,
    generator: String,
    compilers: Option<CompilerPair>,
}

impl CMake {
    /// Create a driver for the CMake project in `source_dir`.
    pub fn new(toolbox: Toolbox, source_dir: impl Into<PathBuf>) -> Self {
        CMake {
            toolbox,
            source_dir: source_dir.into(),
            generator: DEFAULT_GENERATOR.to_string(),
            compilers: None,
        }
    }

    /// Set the CMake generator.
    pub fn generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Use these compilers instead of searching for a family.
    pub fn compilers(mut self, pair: Option<CompilerPair>) -> Self {
        self.compilers = pair;
        self
    }

    fn resolve_compilers(&self, kind: CompilerKind) -> DriverResult<CompilerPair> {
        if let Some(pair) = &self.compilers {
            return Ok(pair.clone());
        }

        let host = self.toolbox.host.platform;
        find_compiler_pair(self.toolbox.tools.as_ref(), kind, host)
            .ok_or_else(|| DriverError::compiler_missing(kind, host))
    }

    /// The configure command line.
    pub fn configure_command(
        &self,
        cmake: &Path,
        out_dir: &Path,
        target: &BuildTarget,
        compilers: &CompilerPair,
    ) -> ProcessBuilder {
        let host = self.toolbox.host;
        let resolved = target.resolve(host);

        let mut cmd = ProcessBuilder::new(cmake)
            .arg("-G")
            .arg(&self.generator)
            .arg("-S")
            .arg(&self.source_dir)
            .arg("-B")
            .arg(out_dir)
            .arg(format!("-DCMAKE_BUILD_TYPE={}", target.config))
            .arg(format!("-DCMAKE_C_COMPILER={}", compilers.cc().display()))
            .arg(format!("-DCMAKE_CXX_COMPILER={}", compilers.cxx().display()));

        if let Some(toolchain) = vcpkg::toolchain_file(self.toolbox.tools.as_ref()) {
            tracing::info!("Using vcpkg toolchain: {}", toolchain.display());
            cmd = cmd.arg(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()));
        }

        if resolved != host {
            tracing::info!("Cross-compiling: {} -> {}", host, resolved);
            cmd = cmd.args(cross_compile_flags(resolved));
        } else {
            tracing::info!("Building for host platform: {}", resolved);
        }

        cmd
    }
}

/// `CMAKE_SYSTEM_*` overrides for a cross build.
pub fn cross_compile_flags(target: Host) -> [String; 2] {
    [
        format!("-DCMAKE_SYSTEM_NAME={}", cmake_system_name(target.platform)),
        format!(
            "-DCMAKE_SYSTEM_PROCESSOR={}",
            cmake_system_processor(target.arch)
        ),
    ]
}

impl NativeBuild for CMake {
    fn clean(&self, out_dir: &Path) -> DriverResult<()> {
        if out_dir.exists() {
            tracing::debug!("Removing native output {}", out_dir.display());
        }
        remove_dir_all_if_exists(out_dir)?;
        Ok(())
    }

    fn compile(
        &self,
        out_dir: &Path,
        target: &BuildTarget,
        compiler: CompilerKind,
    ) -> DriverResult<()> {
        let cmake = self.toolbox.require(CMAKE)?;
        let compilers = self.resolve_compilers(compiler)?;

        recreate_dir(out_dir)?;

        let configure = self.configure_command(&cmake, out_dir, target, &compilers);
        tracing::info!("Configuring CMake...");
        self.toolbox.run_checked(CMAKE, &configure)?;

        let build = ProcessBuilder::new(&cmake)
            .arg("--build")
            .arg(out_dir)
            .arg("--parallel");
        tracing::info!("Building CMake...");
        self.toolbox.run_checked(CMAKE, &build)?;

        tracing::info!("CMake build succeeded, see: {}", out_dir.display());
        Ok(())
    }

    fn install(&self, out_dir: &Path, to_dir: &Path) -> DriverResult<()> {
        let cmake = self.toolbox.require(CMAKE)?;

        let cmd = ProcessBuilder::new(&cmake)
            .arg("--install")
            .arg(out_dir)
            .arg("--prefix")
            .arg(to_dir);
        self.toolbox.run_checked(CMAKE, &cmd)?;

        tracing::info!("Installed native build to {}", to_dir.display());
        Ok(())
    }
}
