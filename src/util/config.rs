//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.torsion/config.toml` - User-wide defaults
//! - Project: `<root>/.torsion/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::cmake::DEFAULT_GENERATOR;
use crate::builder::toolchain::{CompilerKind, CompilerPair};
use crate::core::{Architecture, BuildConfig, Platform, Selection};
use crate::util::process::PathLookup;

/// Orchestrator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build defaults
    pub build: BuildSettings,

    /// Explicit tool locations
    pub tools: ToolPaths,
}

/// Build defaults, using the same vocabulary as the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Compiler family (gcc, clang, msvc, any)
    pub compiler: Option<CompilerKind>,

    /// Build configuration (Debug, Release)
    pub config: Option<BuildConfig>,

    /// Target platform (windows, linux, macos, android, current)
    pub platform: Option<Selection<Platform>>,

    /// Target architecture (x64, x86, arm64, arm, current)
    pub arch: Option<Selection<Architecture>>,

    /// CMake generator (default: Ninja)
    pub generator: Option<String>,

    /// Worker count handed to vcpkg and dotnet (None = cores - 1)
    pub jobs: Option<usize>,
}

/// Explicit executable paths. Each one wins over a `PATH` search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub cmake: Option<PathBuf>,
    pub vcpkg: Option<PathBuf>,
    pub swig: Option<PathBuf>,
    pub dotnet: Option<PathBuf>,
    /// C compiler; only used together with `cxx`
    pub cc: Option<PathBuf>,
    /// C++ compiler; only used together with `cc`
    pub cxx: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let b = other.build;
        if b.compiler.is_some() {
            self.build.compiler = b.compiler;
        }
        if b.config.is_some() {
            self.build.config = b.config;
        }
        if b.platform.is_some() {
            self.build.platform = b.platform;
        }
        if b.arch.is_some() {
            self.build.arch = b.arch;
        }
        if b.generator.is_some() {
            self.build.generator = b.generator;
        }
        if b.jobs.is_some() {
            self.build.jobs = b.jobs;
        }

        let t = other.tools;
        if t.cmake.is_some() {
            self.tools.cmake = t.cmake;
        }
        if t.vcpkg.is_some() {
            self.tools.vcpkg = t.vcpkg;
        }
        if t.swig.is_some() {
            self.tools.swig = t.swig;
        }
        if t.dotnet.is_some() {
            self.tools.dotnet = t.dotnet;
        }
        if t.cc.is_some() {
            self.tools.cc = t.cc;
        }
        if t.cxx.is_some() {
            self.tools.cxx = t.cxx;
        }
    }

    /// Configured compiler family.
    pub fn compiler(&self) -> Option<CompilerKind> {
        self.build.compiler
    }

    /// Configured build configuration.
    pub fn build_config(&self) -> Option<BuildConfig> {
        self.build.config
    }

    /// Configured target platform. `current` and unset both mean the host.
    pub fn platform(&self) -> Option<Platform> {
        self.build.platform.and_then(Selection::into_option)
    }

    /// Configured target architecture. `current` and unset both mean the host.
    pub fn arch(&self) -> Option<Architecture> {
        self.build.arch.and_then(Selection::into_option)
    }

    /// CMake generator name.
    pub fn generator(&self) -> &str {
        self.build.generator.as_deref().unwrap_or(DEFAULT_GENERATOR)
    }

    /// A tool lookup honouring `[tools]`.
    pub fn tool_lookup(&self) -> PathLookup {
        let mut lookup = PathLookup::new();
        let entries = [
            ("cmake", &self.tools.cmake),
            ("vcpkg", &self.tools.vcpkg),
            ("swig", &self.tools.swig),
            ("dotnet", &self.tools.dotnet),
        ];
        for (name, path) in entries {
            if let Some(path) = path {
                lookup = lookup.with_override(name, path);
            }
        }
        lookup
    }

    /// Explicit compiler pair from `[tools] cc` and `cxx`.
    pub fn compiler_pair(&self) -> Option<CompilerPair> {
        match (&self.tools.cc, &self.tools.cxx) {
            (Some(cc), Some(cxx)) => Some(CompilerPair::new(cc, cxx)),
            (None, None) => None,
            _ => {
                tracing::warn!("Ignoring [tools] cc/cxx: both must be set");
                None
            }
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.torsion/config.toml)
/// 2. Global config (~/.torsion/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}
