//! vcpkg package manager driver.
//!
//! Installs the packages declared in the native manifest (`vcpkg.json`)
//! for a target triplet and locates vcpkg's CMake integration script.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::builder::context::Toolbox;
use crate::builder::driver::PackageManager;
use crate::builder::errors::{DriverError, DriverResult};
use crate::core::Triplet;
use crate::util::process::{ProcessBuilder, ToolLookup};

/// Executable name.
pub const VCPKG: &str = "vcpkg";

/// Manifest file expected in the native source directory.
pub const MANIFEST_FILE: &str = "vcpkg.json";

/// The parts of `vcpkg.json` the driver reports on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VcpkgManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub dependencies: Vec<ManifestDependency>,
}

/// A dependency is either a bare port name or an object with a `name`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ManifestDependency {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        features: Vec<serde_json::Value>,
    },
}

impl ManifestDependency {
    pub fn name(&self) -> &str {
        match self {
            ManifestDependency::Name(name) => name,
            ManifestDependency::Detailed { name, .. } => name,
        }
    }
}

impl VcpkgManifest {
    pub fn load(path: &Path) -> DriverResult<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let manifest = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(manifest)
    }

    pub fn dependency_names(&self) -> Vec<&str> {
        self.dependencies.iter().map(ManifestDependency::name).collect()
    }
}

/// Path of vcpkg's CMake toolchain file, derived from where the vcpkg
/// executable lives.
///
/// The executable may be a symlink into the vcpkg root, so the resolved
/// location is tried as well.
pub fn toolchain_file(tools: &dyn ToolLookup) -> Option<PathBuf> {
    let Some(exe) = tools.find(VCPKG) else {
        tracing::debug!("vcpkg not on PATH, no toolchain file");
        return None;
    };

    let mut candidates = vec![exe.clone()];
    if let Ok(real) = exe.canonicalize() {
        if real != exe {
            candidates.push(real);
        }
    }

    for candidate in &candidates {
        let Some(root) = candidate.parent() else {
            continue;
        };
        let script = root.join("scripts").join("buildsystems").join("vcpkg.cmake");
        if script.is_file() {
            return Some(script);
        }
    }

    tracing::warn!(
        "vcpkg toolchain file not found beside {}",
        exe.display()
    );
    None
}

/// Drives `vcpkg install` in manifest mode.
#[derive(Debug, Clone)]
pub struct Vcpkg {
    toolbox: Toolbox,
    source_dir: PathBuf,
}

impl Vcpkg {
    /// `source_dir` is the directory holding `vcpkg.json`.
    pub fn new(toolbox: Toolbox, source_dir: impl Into<PathBuf>) -> Self {
        Vcpkg {
            toolbox,
            source_dir: source_dir.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.toolbox.tools.is_available(VCPKG)
    }

    pub fn toolchain_file(&self) -> Option<PathBuf> {
        toolchain_file(self.toolbox.tools.as_ref())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.source_dir.join(MANIFEST_FILE)
    }

    /// Triplet of the machine running the build.
    pub fn host_triplet(&self) -> DriverResult<Triplet> {
        let host = self.toolbox.host;
        Triplet::for_host(host).ok_or(DriverError::UnsupportedTarget {
            platform: host.platform,
            arch: host.arch,
        })
    }

    /// The `vcpkg install` command for `triplet`.
    pub fn install_command(&self, vcpkg: &Path, triplet: Triplet, host: Triplet) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(vcpkg)
            .arg("install")
            .arg(format!("--triplet={}", triplet))
            .arg(format!("--host-triplet={}", host));

        if triplet != host {
            cmd = cmd.arg("--allow-unsupported");
        }

        cmd.env("VCPKG_MAX_CONCURRENCY", self.toolbox.jobs.to_string())
            .cwd(&self.source_dir)
    }
}

impl PackageManager for Vcpkg {
    fn build_packages(&self, triplet: Option<Triplet>) -> DriverResult<()> {
        let vcpkg = self.toolbox.require(VCPKG)?;

        let manifest_path = self.manifest_path();
        if !manifest_path.is_file() {
            return Err(DriverError::discovery(MANIFEST_FILE, &self.source_dir));
        }
        let manifest = VcpkgManifest::load(&manifest_path)?;

        let host = self.host_triplet()?;
        let triplet = triplet.unwrap_or(host);

        tracing::info!(
            "Installing vcpkg packages with {} cores from {} to {}",
            self.toolbox.jobs,
            host,
            triplet
        );
        let names = manifest.dependency_names();
        if names.is_empty() {
            tracing::debug!("{} declares no dependencies", manifest_path.display());
        } else {
            tracing::debug!("Dependencies: {}", names.join(", "));
        }

        let cmd = self.install_command(&vcpkg, triplet, host);
        self.toolbox.run_checked(VCPKG, &cmd)?;

        tracing::info!("Installed {} vcpkg package(s)", names.len());
        Ok(())
    }
}
